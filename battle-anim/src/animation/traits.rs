//! # Traits 模块
//!
//! 插值属性的核心接口。
//!
//! ## 核心概念
//!
//! - `Animatable`: 可动画对象接口，按属性名读写 f64
//! - `PropertyRef`: 某个对象上的某个属性，时间轴叶子通过它写值
//! - `ValueCell`: 只有一个属性的最小可动画对象句柄

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// 可动画对象接口
///
/// 对象通过实现此 trait 声明自己有哪些属性可以被动画。
/// 写入通过 `&self` 完成，实现方使用 `Cell`/`RefCell` 持有内部状态，
/// 这样多个叶子可以同时持有同一对象。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Gauge {
///     level: Cell<f64>,
/// }
///
/// impl Animatable for Gauge {
///     fn get_property(&self, property_id: &str) -> Option<f64> {
///         match property_id {
///             "level" => Some(self.level.get()),
///             _ => None,
///         }
///     }
///
///     fn set_property(&self, property_id: &str, value: f64) -> bool {
///         match property_id {
///             "level" => { self.level.set(value); true }
///             _ => false,
///         }
///     }
///
///     fn property_list(&self) -> &'static [&'static str] {
///         &["level"]
///     }
/// }
/// ```
pub trait Animatable: 'static {
    /// 获取属性的当前值
    ///
    /// # 返回
    /// - `Some(value)`: 属性存在
    /// - `None`: 属性不存在
    fn get_property(&self, property_id: &str) -> Option<f64>;

    /// 设置属性的新值
    ///
    /// # 返回
    /// - `true`: 设置成功
    /// - `false`: 属性不存在
    fn set_property(&self, property_id: &str, value: f64) -> bool;

    /// 获取所有可动画属性的列表
    ///
    /// 用于调试和验证。
    fn property_list(&self) -> &'static [&'static str];
}

/// 属性引用
///
/// 指向某个可动画对象上的一个属性。克隆只复制引用，不复制对象。
#[derive(Clone)]
pub struct PropertyRef {
    target: Rc<dyn Animatable>,
    property_id: &'static str,
}

impl PropertyRef {
    /// 创建属性引用
    ///
    /// debug 构建下会检查属性是否存在。
    pub fn new(target: Rc<dyn Animatable>, property_id: &'static str) -> Self {
        debug_assert!(
            target.property_list().contains(&property_id),
            "未知属性 '{property_id}'"
        );
        Self {
            target,
            property_id,
        }
    }

    /// 属性名称
    pub fn property_id(&self) -> &'static str {
        self.property_id
    }

    /// 读取当前值（属性不存在时为 0）
    pub fn get(&self) -> f64 {
        self.target.get_property(self.property_id).unwrap_or(0.0)
    }

    /// 写入新值
    pub fn set(&self, value: f64) -> bool {
        self.target.set_property(self.property_id, value)
    }

    /// 是否指向同一对象的同一属性
    pub fn same_as(&self, other: &PropertyRef) -> bool {
        self.property_id == other.property_id
            && std::ptr::addr_eq(Rc::as_ptr(&self.target), Rc::as_ptr(&other.target))
    }
}

impl fmt::Debug for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyRef({} = {})", self.property_id, self.get())
    }
}

/// 单值可动画对象
///
/// 克隆共享同一个值，属性名为 `"value"`。
#[derive(Debug, Clone, Default)]
pub struct ValueCell {
    slot: Rc<ValueSlot>,
}

#[derive(Debug, Default)]
struct ValueSlot(Cell<f64>);

impl ValueCell {
    /// 创建新的单值对象
    pub fn new(initial_value: f64) -> Self {
        Self {
            slot: Rc::new(ValueSlot(Cell::new(initial_value))),
        }
    }

    /// 当前值
    pub fn get(&self) -> f64 {
        self.slot.0.get()
    }

    /// 设置值
    pub fn set(&self, value: f64) {
        self.slot.0.set(value);
    }

    /// 作为时间轴可用的属性引用
    ///
    /// 多次调用得到的引用指向同一属性（`same_as` 为真）。
    pub fn property(&self) -> PropertyRef {
        PropertyRef::new(self.slot.clone(), "value")
    }
}

impl Animatable for ValueSlot {
    fn get_property(&self, property_id: &str) -> Option<f64> {
        match property_id {
            "value" => Some(self.0.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f64) -> bool {
        match property_id {
            "value" => {
                self.0.set(value);
                true
            }
            _ => false,
        }
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["value"]
    }
}
