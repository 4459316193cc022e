#![forbid(unsafe_code)]

//! Drag-item and drop-target identifiers as seen by the host drag framework.
//!
//! The framework addresses every draggable and droppable element by a flat
//! string id. Lessons use their bare id; everything else carries a prefix:
//!
//! | element | id |
//! |---|---|
//! | lesson | `<lessonId>` |
//! | resource | `resource-<resourceId>` |
//! | module drop zone | `module-zone-<moduleId>` |
//! | add-lesson affordance | `add-lesson-<moduleId>` |
//!
//! [`DragItem::parse`] / [`DropTarget::parse`] and the `dom_id` formatters are
//! inverse of each other.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{LessonId, ModuleId, ResourceId};

/// Prefix marking resource items.
pub const RESOURCE_ID_PREFIX: &str = "resource-";

/// Prefix marking a module's drop zone.
pub const MODULE_ZONE_PREFIX: &str = "module-zone-";

/// Prefix marking a module's add-lesson affordance.
pub const ADD_LESSON_PREFIX: &str = "add-lesson-";

/// Return the framework prefix `raw` starts with, if any.
///
/// Lesson ids travel unprefixed, so a lesson id starting with one of these
/// would decode as a different kind of item.
#[must_use]
pub fn reserved_prefix(raw: &str) -> Option<&'static str> {
    [ADD_LESSON_PREFIX, MODULE_ZONE_PREFIX, RESOURCE_ID_PREFIX]
        .into_iter()
        .find(|prefix| raw.starts_with(prefix))
}

/// Kind of a drop target, used by the collision priority rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Lesson,
    Resource,
    ModuleZone,
    AddLessonAffordance,
}

impl TargetKind {
    /// Zone and affordance targets stand for a whole module rather than a slot.
    #[must_use]
    pub const fn is_module_marker(self) -> bool {
        matches!(self, Self::ModuleZone | Self::AddLessonAffordance)
    }
}

/// A droppable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum DropTarget {
    Lesson(LessonId),
    Resource(ResourceId),
    ModuleZone(ModuleId),
    AddLessonAffordance(ModuleId),
}

impl DropTarget {
    /// Decode a framework id.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix(ADD_LESSON_PREFIX) {
            Self::AddLessonAffordance(ModuleId::from(rest))
        } else if let Some(rest) = raw.strip_prefix(MODULE_ZONE_PREFIX) {
            Self::ModuleZone(ModuleId::from(rest))
        } else if let Some(rest) = raw.strip_prefix(RESOURCE_ID_PREFIX) {
            Self::Resource(ResourceId::from(rest))
        } else {
            Self::Lesson(LessonId::from(raw))
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Lesson(_) => TargetKind::Lesson,
            Self::Resource(_) => TargetKind::Resource,
            Self::ModuleZone(_) => TargetKind::ModuleZone,
            Self::AddLessonAffordance(_) => TargetKind::AddLessonAffordance,
        }
    }

    /// Module addressed by a zone or affordance target.
    #[must_use]
    pub fn module_id(&self) -> Option<&ModuleId> {
        match self {
            Self::ModuleZone(id) | Self::AddLessonAffordance(id) => Some(id),
            Self::Lesson(_) | Self::Resource(_) => None,
        }
    }

    /// Encode as a framework id.
    #[must_use]
    pub fn dom_id(&self) -> String {
        self.to_string()
    }

    /// True if this target refers to the same element as `item`.
    #[must_use]
    pub fn is_item(&self, item: &DragItem) -> bool {
        match (self, item) {
            (Self::Lesson(target), DragItem::Lesson(source)) => target == source,
            (Self::Resource(target), DragItem::Resource(source)) => target == source,
            _ => false,
        }
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lesson(id) => write!(f, "{id}"),
            Self::Resource(id) => write!(f, "{RESOURCE_ID_PREFIX}{id}"),
            Self::ModuleZone(id) => write!(f, "{MODULE_ZONE_PREFIX}{id}"),
            Self::AddLessonAffordance(id) => write!(f, "{ADD_LESSON_PREFIX}{id}"),
        }
    }
}

/// A draggable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum DragItem {
    Lesson(LessonId),
    Resource(ResourceId),
}

impl DragItem {
    /// Decode a framework id of the active (dragged) element.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(RESOURCE_ID_PREFIX) {
            Some(rest) => Self::Resource(ResourceId::from(rest)),
            None => Self::Lesson(LessonId::from(raw)),
        }
    }

    #[must_use]
    pub const fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }

    #[must_use]
    pub fn as_lesson(&self) -> Option<&LessonId> {
        match self {
            Self::Lesson(id) => Some(id),
            Self::Resource(_) => None,
        }
    }

    /// Encode as a framework id.
    #[must_use]
    pub fn dom_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DragItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lesson(id) => write!(f, "{id}"),
            Self::Resource(id) => write!(f, "{RESOURCE_ID_PREFIX}{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_prefix_matches_only_leading_markers() {
        assert_eq!(reserved_prefix("resource-intro"), Some(RESOURCE_ID_PREFIX));
        assert_eq!(reserved_prefix("module-zone-"), Some(MODULE_ZONE_PREFIX));
        assert_eq!(reserved_prefix("add-lesson-m"), Some(ADD_LESSON_PREFIX));
        assert_eq!(reserved_prefix("intro-resource-1"), None);
        assert_eq!(reserved_prefix("resource"), None);
    }

    #[test]
    fn parse_recognizes_every_prefix() {
        assert_eq!(
            DropTarget::parse("add-lesson-m1"),
            DropTarget::AddLessonAffordance(ModuleId::from("m1"))
        );
        assert_eq!(
            DropTarget::parse("module-zone-m1"),
            DropTarget::ModuleZone(ModuleId::from("m1"))
        );
        assert_eq!(
            DropTarget::parse("resource-r9"),
            DropTarget::Resource(ResourceId::from("r9"))
        );
        assert_eq!(
            DropTarget::parse("l3"),
            DropTarget::Lesson(LessonId::from("l3"))
        );
    }

    #[test]
    fn dom_id_is_inverse_of_parse() {
        for raw in ["add-lesson-core", "module-zone-intro", "resource-slides", "L2"] {
            assert_eq!(DropTarget::parse(raw).dom_id(), raw);
        }
        for raw in ["resource-slides", "L2"] {
            assert_eq!(DragItem::parse(raw).dom_id(), raw);
        }
    }

    #[test]
    fn module_markers() {
        assert!(TargetKind::ModuleZone.is_module_marker());
        assert!(TargetKind::AddLessonAffordance.is_module_marker());
        assert!(!TargetKind::Lesson.is_module_marker());
        assert!(!TargetKind::Resource.is_module_marker());
    }

    #[test]
    fn same_element_detection() {
        let lesson = DragItem::Lesson(LessonId::from("a"));
        assert!(DropTarget::Lesson(LessonId::from("a")).is_item(&lesson));
        assert!(!DropTarget::Lesson(LessonId::from("b")).is_item(&lesson));
        assert!(!DropTarget::Resource(ResourceId::from("a")).is_item(&lesson));
    }

    #[test]
    fn targets_serialize_with_kind_tag() {
        let json = serde_json::to_string(&DropTarget::ModuleZone(ModuleId::from("m")))
            .expect("serialize");
        assert_eq!(json, r#"{"kind":"module-zone","id":"m"}"#);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn framework_id() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Za-z0-9_-]{0,12}",
            "[a-z0-9]{0,8}".prop_map(|id| format!("{RESOURCE_ID_PREFIX}{id}")),
            "[a-z0-9]{0,8}".prop_map(|id| format!("{MODULE_ZONE_PREFIX}{id}")),
            "[a-z0-9]{0,8}".prop_map(|id| format!("{ADD_LESSON_PREFIX}{id}")),
        ]
    }

    proptest! {
        #[test]
        fn framework_ids_decode_losslessly(raw in framework_id()) {
            prop_assert_eq!(DropTarget::parse(&raw).dom_id(), raw.clone());
            prop_assert_eq!(DragItem::parse(&raw).dom_id(), raw);
        }

        #[test]
        fn only_marker_targets_name_a_module(raw in framework_id()) {
            let target = DropTarget::parse(&raw);
            prop_assert_eq!(target.module_id().is_some(), target.kind().is_module_marker());
        }
    }
}
