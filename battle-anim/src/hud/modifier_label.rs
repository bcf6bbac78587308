//! # ModifierLabel 模块
//!
//! 技能标签：预先登记若干"页"（每页是一组触发的技能名），
//! 时间轴通过离散切换 `page` 属性决定显示哪一页，`-1` 表示隐藏。

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::animation::{Animatable, PropertyRef};
use crate::scene::{Color, SceneNode};
use crate::strike::Modifier;

/// 隐藏时的页码
pub const HIDDEN_PAGE: f64 = -1.0;

#[derive(Debug)]
struct LabelInner {
    pages: RefCell<Vec<String>>,
    page: Cell<f64>,
    text: SceneNode,
}

impl LabelInner {
    fn visible_page(&self) -> Option<usize> {
        let page = self.page.get().round();
        if page < 0.0 {
            return None;
        }
        let index = page as usize;
        (index < self.pages.borrow().len()).then_some(index)
    }

    fn refresh(&self) {
        match self.visible_page() {
            Some(index) => {
                let content = self.pages.borrow()[index].clone();
                self.text.set_text(content);
                self.text.set_opacity(1.0);
            }
            None => {
                self.text.set_text("");
                self.text.set_opacity(0.0);
            }
        }
    }
}

impl Animatable for LabelInner {
    fn get_property(&self, property_id: &str) -> Option<f64> {
        match property_id {
            "page" => Some(self.page.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f64) -> bool {
        match property_id {
            "page" => {
                self.page.set(value);
                self.refresh();
                true
            }
            _ => false,
        }
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["page"]
    }
}

/// 技能标签
#[derive(Debug, Clone)]
pub struct ModifierLabel {
    inner: Rc<LabelInner>,
}

impl ModifierLabel {
    /// 创建空标签（隐藏）
    pub fn new(name: &str, color: Color) -> Self {
        let inner = Rc::new(LabelInner {
            pages: RefCell::new(Vec::new()),
            page: Cell::new(HIDDEN_PAGE),
            text: SceneNode::text(name, "", color),
        });
        inner.refresh();
        Self { inner }
    }

    /// 登记一页
    ///
    /// # 返回
    /// - `Some(index)`: 新页的页码
    /// - `None`: 技能集合为空，不登记
    pub fn add_page(&self, modifiers: &BTreeSet<Modifier>) -> Option<usize> {
        if modifiers.is_empty() {
            return None;
        }
        let content = modifiers
            .iter()
            .map(Modifier::name)
            .collect::<Vec<_>>()
            .join(" · ");
        let mut pages = self.inner.pages.borrow_mut();
        pages.push(content);
        Some(pages.len() - 1)
    }

    /// 标签节点
    pub fn node(&self) -> &SceneNode {
        &self.inner.text
    }

    /// 已登记页数
    pub fn page_count(&self) -> usize {
        self.inner.pages.borrow().len()
    }

    /// 当前显示的页码
    pub fn current_page(&self) -> Option<usize> {
        self.inner.visible_page()
    }

    /// 当前显示的文本
    pub fn current_text(&self) -> Option<String> {
        self.current_page()
            .map(|index| self.inner.pages.borrow()[index].clone())
    }

    /// `page` 属性引用
    pub fn page_property(&self) -> PropertyRef {
        PropertyRef::new(self.inner.clone(), "page")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(names: &[&str]) -> BTreeSet<Modifier> {
        names.iter().map(|n| Modifier::new(*n)).collect()
    }

    #[test]
    fn test_pages() {
        let label = ModifierLabel::new("label", Color::WHITE);
        assert_eq!(label.add_page(&BTreeSet::new()), None);
        assert_eq!(label.add_page(&set_of(&["Pierce", "Crit"])), Some(0));
        assert_eq!(label.add_page(&set_of(&["Drain"])), Some(1));
        assert_eq!(label.page_count(), 2);
        assert_eq!(label.current_page(), None);
        assert_eq!(label.node().opacity(), 0.0);

        label.page_property().set(0.0);
        assert_eq!(label.current_text().as_deref(), Some("Crit · Pierce"));
        assert_eq!(label.node().opacity(), 1.0);

        label.page_property().set(HIDDEN_PAGE);
        assert_eq!(label.current_text(), None);
        assert_eq!(label.node().opacity(), 0.0);
    }

    #[test]
    fn test_out_of_range_page_hidden() {
        let label = ModifierLabel::new("label", Color::WHITE);
        label.add_page(&set_of(&["Crit"]));
        label.page_property().set(5.0);
        assert_eq!(label.current_page(), None);
    }
}
