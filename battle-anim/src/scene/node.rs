//! # Node 模块
//!
//! 场景树节点。
//!
//! `SceneNode` 是共享句柄：克隆只复制引用，两个句柄指向同一节点时
//! `same_node` 为真。节点的变换、透明度与泛白程度可以被时间轴叶子改写。

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{Color, Point, Transform};
use crate::animation::{Animatable, PropertyRef};

/// 节点内容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// 纯容器
    Group,
    /// 矩形
    Rect { width: f64, height: f64, color: Color },
    /// 文本
    Text { content: String, color: Color },
    /// 图标（资源名）
    Icon { source: String },
}

/// 节点可动画属性
pub const NODE_PROPERTIES: &[&str] = &[
    "translate_x",
    "translate_y",
    "scale_x",
    "scale_y",
    "rotation",
    "opacity",
    "whiten",
];

#[derive(Debug)]
struct NodeData {
    name: String,
    kind: NodeKind,
    transform: Transform,
    opacity: f64,
    whiten: f64,
    children: Vec<SceneNode>,
}

#[derive(Debug)]
struct NodeInner {
    data: RefCell<NodeData>,
}

impl Animatable for NodeInner {
    fn get_property(&self, property_id: &str) -> Option<f64> {
        let data = self.data.borrow();
        match property_id {
            "translate_x" => Some(data.transform.translate.x),
            "translate_y" => Some(data.transform.translate.y),
            "scale_x" => Some(data.transform.scale.x),
            "scale_y" => Some(data.transform.scale.y),
            "rotation" => Some(data.transform.rotation),
            "opacity" => Some(data.opacity),
            "whiten" => Some(data.whiten),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f64) -> bool {
        let mut data = self.data.borrow_mut();
        match property_id {
            "translate_x" => data.transform.translate.x = value,
            "translate_y" => data.transform.translate.y = value,
            "scale_x" => data.transform.scale.x = value,
            "scale_y" => data.transform.scale.y = value,
            "rotation" => data.transform.rotation = value,
            "opacity" => data.opacity = value.clamp(0.0, 1.0),
            "whiten" => data.whiten = value.clamp(0.0, 1.0),
            _ => return false,
        }
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        NODE_PROPERTIES
    }
}

/// 场景节点句柄
#[derive(Clone)]
pub struct SceneNode {
    inner: Rc<NodeInner>,
}

impl SceneNode {
    // ========== 构建 ==========

    /// 创建节点
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                data: RefCell::new(NodeData {
                    name: name.into(),
                    kind,
                    transform: Transform::identity(),
                    opacity: 1.0,
                    whiten: 0.0,
                    children: Vec::new(),
                }),
            }),
        }
    }

    /// 容器节点
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    /// 矩形节点
    pub fn rect(name: impl Into<String>, width: f64, height: f64, color: Color) -> Self {
        Self::new(
            name,
            NodeKind::Rect {
                width,
                height,
                color,
            },
        )
    }

    /// 文本节点
    pub fn text(name: impl Into<String>, content: impl Into<String>, color: Color) -> Self {
        Self::new(
            name,
            NodeKind::Text {
                content: content.into(),
                color,
            },
        )
    }

    /// 图标节点
    pub fn icon(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(
            name,
            NodeKind::Icon {
                source: source.into(),
            },
        )
    }

    /// 设置平移（构建用）
    pub fn at(self, x: f64, y: f64) -> Self {
        self.inner.data.borrow_mut().transform.translate = Point::new(x, y);
        self
    }

    /// 设置整个变换（构建用）
    pub fn with_transform(self, transform: Transform) -> Self {
        self.set_transform(transform);
        self
    }

    /// 设置透明度（构建用）
    pub fn with_opacity(self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// 追加子节点，后添加的绘制在上层
    pub fn add_child(&self, child: SceneNode) {
        debug_assert!(!child.same_node(self), "节点不能成为自己的子节点");
        self.inner.data.borrow_mut().children.push(child);
    }

    /// 追加子节点（构建用）
    pub fn with_child(self, child: SceneNode) -> Self {
        self.add_child(child);
        self
    }

    // ========== 查询 ==========

    /// 是否为同一节点
    pub fn same_node(&self, other: &SceneNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// 节点名称
    pub fn name(&self) -> String {
        self.inner.data.borrow().name.clone()
    }

    /// 节点内容
    pub fn kind(&self) -> NodeKind {
        self.inner.data.borrow().kind.clone()
    }

    /// 局部变换
    pub fn transform(&self) -> Transform {
        self.inner.data.borrow().transform
    }

    /// 透明度
    pub fn opacity(&self) -> f64 {
        self.inner.data.borrow().opacity
    }

    /// 泛白程度（0 = 正常，1 = 纯白）
    pub fn whiten(&self) -> f64 {
        self.inner.data.borrow().whiten
    }

    /// 子节点（句柄拷贝）
    pub fn children(&self) -> Vec<SceneNode> {
        self.inner.data.borrow().children.clone()
    }

    /// 子节点数量
    pub fn child_count(&self) -> usize {
        self.inner.data.borrow().children.len()
    }

    /// 子节点中是否包含 `node`（仅直接子节点）
    pub fn has_child(&self, node: &SceneNode) -> bool {
        self.inner
            .data
            .borrow()
            .children
            .iter()
            .any(|child| child.same_node(node))
    }

    /// 深度优先按名称查找（包括自身）
    pub fn find(&self, name: &str) -> Option<SceneNode> {
        if self.inner.data.borrow().name == name {
            return Some(self.clone());
        }
        self.children().iter().find_map(|child| child.find(name))
    }

    // ========== 修改 ==========

    /// 设置局部变换
    pub fn set_transform(&self, transform: Transform) {
        self.inner.data.borrow_mut().transform = transform;
    }

    /// 设置透明度（截断到 0-1）
    pub fn set_opacity(&self, opacity: f64) {
        self.inner.set_property("opacity", opacity);
    }

    /// 替换文本内容
    ///
    /// # 返回
    /// - `false`: 不是文本节点
    pub fn set_text(&self, content: impl Into<String>) -> bool {
        match &mut self.inner.data.borrow_mut().kind {
            NodeKind::Text { content: old, .. } => {
                *old = content.into();
                true
            }
            _ => false,
        }
    }

    /// 修改矩形宽度
    ///
    /// # 返回
    /// - `false`: 不是矩形节点
    pub fn set_rect_width(&self, new_width: f64) -> bool {
        match &mut self.inner.data.borrow_mut().kind {
            NodeKind::Rect { width, .. } => {
                *width = new_width;
                true
            }
            _ => false,
        }
    }

    // ========== 动画 ==========

    /// 获取节点属性的引用
    ///
    /// 可用属性见 [`NODE_PROPERTIES`]。
    pub fn property(&self, property_id: &'static str) -> PropertyRef {
        PropertyRef::new(self.inner.clone(), property_id)
    }

    /// 生成纯数据快照
    pub fn snapshot(&self) -> NodeSnapshot {
        let data = self.inner.data.borrow();
        NodeSnapshot {
            name: data.name.clone(),
            kind: data.kind.clone(),
            transform: data.transform,
            opacity: data.opacity,
            whiten: data.whiten,
            children: data.children.iter().map(SceneNode::snapshot).collect(),
        }
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.data.borrow();
        f.debug_struct("SceneNode")
            .field("name", &data.name)
            .field("kind", &data.kind)
            .field("children", &data.children.len())
            .finish()
    }
}

/// 节点的纯数据快照，可跨线程传递与序列化
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub opacity: f64,
    pub whiten: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// 深度优先按名称查找（包括自身）
    pub fn find(&self, name: &str) -> Option<&NodeSnapshot> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// 节点总数（包括自身）
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NodeSnapshot::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let a = SceneNode::group("a");
        let b = SceneNode::group("a");
        assert!(a.same_node(&a.clone()));
        assert!(!a.same_node(&b));
    }

    #[test]
    fn test_find_depth_first() {
        let root = SceneNode::group("root")
            .with_child(SceneNode::group("camera").with_child(SceneNode::group("pan")))
            .with_child(SceneNode::group("hud"));

        assert_eq!(root.find("pan").map(|n| n.name()), Some("pan".to_string()));
        assert!(root.find("missing").is_none());
        assert_eq!(root.snapshot().node_count(), 4);
    }

    #[test]
    fn test_property_writes_through() {
        let node = SceneNode::rect("body", 16.0, 24.0, Color::BLACK);
        let opacity = node.property("opacity");
        let translate_x = node.property("translate_x");

        opacity.set(0.25);
        translate_x.set(-40.0);
        assert_eq!(node.opacity(), 0.25);
        assert_eq!(node.transform().translate.x, -40.0);

        // 同一节点同一属性
        assert!(opacity.same_as(&node.clone().property("opacity")));
        assert!(!opacity.same_as(&translate_x));
    }

    #[test]
    fn test_opacity_clamped() {
        let node = SceneNode::group("n");
        node.property("opacity").set(1.5);
        assert_eq!(node.opacity(), 1.0);
        node.property("whiten").set(-1.0);
        assert_eq!(node.whiten(), 0.0);
    }

    #[test]
    fn test_text_and_rect_updates() {
        let label = SceneNode::text("hp", "40", Color::WHITE);
        assert!(label.set_text("20"));
        assert!(!label.set_rect_width(3.0));
        assert_eq!(
            label.kind(),
            NodeKind::Text {
                content: "20".to_string(),
                color: Color::WHITE
            }
        );

        let fill = SceneNode::rect("fill", 60.0, 4.0, Color::WHITE);
        assert!(fill.set_rect_width(30.0));
        assert!(matches!(fill.kind(), NodeKind::Rect { width, .. } if width == 30.0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let node = SceneNode::icon("weapon", "sword.png").at(4.0, 2.0);
        let json = serde_json::to_value(node.snapshot()).unwrap();
        assert_eq!(json["kind"]["type"], "icon");
        assert_eq!(json["kind"]["source"], "sword.png");
        assert_eq!(json["transform"]["translate"]["x"], 4.0);
        assert!(json.get("children").is_none());
    }
}
