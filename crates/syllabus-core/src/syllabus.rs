#![forbid(unsafe_code)]

//! Course syllabus model: ordered modules of ordered lessons.
//!
//! A [`Syllabus`] is owned by one builder session. It is rehydrated from the
//! course data provider and replaced wholesale on refresh; drag operations
//! only change which module a lesson sits in and the order inside a module.
//!
//! # Invariants
//!
//! 1. Every lesson id appears in exactly one module.
//! 2. Module ids are unique within the syllabus.
//! 3. Resource ids are unique on the resource shelf.
//! 4. No identifier is empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{LessonId, ModuleId, ResourceId};
use crate::target::reserved_prefix;

/// Lesson format discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Video,
    Quiz,
    Article,
}

impl LessonKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Quiz => "quiz",
            Self::Article => "article",
        }
    }
}

/// Type-specific lesson payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonContent {
    Video {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_secs: Option<u32>,
    },
    Quiz {
        #[serde(default)]
        question_count: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        passing_score: Option<u8>,
    },
    Article {
        #[serde(default)]
        body: String,
    },
}

impl LessonContent {
    #[must_use]
    pub const fn kind(&self) -> LessonKind {
        match self {
            Self::Video { .. } => LessonKind::Video,
            Self::Quiz { .. } => LessonKind::Quiz,
            Self::Article { .. } => LessonKind::Article,
        }
    }
}

/// One lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(flatten)]
    pub content: LessonContent,
}

impl Lesson {
    #[must_use]
    pub fn new(id: impl Into<LessonId>, title: impl Into<String>, content: LessonContent) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content,
        }
    }

    /// Video lesson without upload metadata.
    #[must_use]
    pub fn video(id: impl Into<LessonId>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            title,
            LessonContent::Video {
                video_url: None,
                duration_secs: None,
            },
        )
    }

    /// Empty quiz lesson.
    #[must_use]
    pub fn quiz(id: impl Into<LessonId>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            title,
            LessonContent::Quiz {
                question_count: 0,
                passing_score: None,
            },
        )
    }

    /// Article lesson with an empty body.
    #[must_use]
    pub fn article(id: impl Into<LessonId>, title: impl Into<String>) -> Self {
        Self::new(id, title, LessonContent::Article { body: String::new() })
    }

    #[must_use]
    pub const fn kind(&self) -> LessonKind {
        self.content.kind()
    }
}

/// A titled, ordered group of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Module {
    #[must_use]
    pub fn new(id: impl Into<ModuleId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            lessons: Vec::new(),
        }
    }

    /// Builder-style lesson append.
    #[must_use]
    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Position of a lesson within this module.
    #[must_use]
    pub fn lesson_index(&self, lesson: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|candidate| &candidate.id == lesson)
    }

    /// Lesson ids in display order.
    #[must_use]
    pub fn lesson_ids(&self) -> Vec<LessonId> {
        self.lessons.iter().map(|lesson| lesson.id.clone()).collect()
    }
}

/// A course resource (slides, handouts, links) shown on a sortable shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Resource {
    #[must_use]
    pub fn new(id: impl Into<ResourceId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
        }
    }
}

/// Where a lesson currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonLocation {
    pub module_index: usize,
    pub lesson_index: usize,
}

/// The full ordered course content tree being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Syllabus {
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Syllabus {
    #[must_use]
    pub fn new(modules: Vec<Module>) -> Self {
        Self {
            modules,
            resources: Vec::new(),
        }
    }

    /// Builder-style resource shelf.
    #[must_use]
    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|module| &module.id == id)
    }

    #[must_use]
    pub fn module_index(&self, id: &ModuleId) -> Option<usize> {
        self.modules.iter().position(|module| &module.id == id)
    }

    /// Find the module and slot holding `lesson`.
    #[must_use]
    pub fn locate_lesson(&self, lesson: &LessonId) -> Option<LessonLocation> {
        self.modules
            .iter()
            .enumerate()
            .find_map(|(module_index, module)| {
                module.lesson_index(lesson).map(|lesson_index| LessonLocation {
                    module_index,
                    lesson_index,
                })
            })
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        let location = self.locate_lesson(id)?;
        self.modules[location.module_index]
            .lessons
            .get(location.lesson_index)
    }

    /// Module currently owning `lesson`.
    #[must_use]
    pub fn module_of(&self, lesson: &LessonId) -> Option<&Module> {
        let location = self.locate_lesson(lesson)?;
        self.modules.get(location.module_index)
    }

    #[must_use]
    pub fn resource_index(&self, id: &ResourceId) -> Option<usize> {
        self.resources.iter().position(|resource| &resource.id == id)
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|module| module.lessons.len()).sum()
    }

    /// Lesson-to-module assignment. Used to check the no-duplication /
    /// no-orphaning invariant across mutations.
    #[must_use]
    pub fn membership(&self) -> BTreeMap<LessonId, ModuleId> {
        self.modules
            .iter()
            .flat_map(|module| {
                module
                    .lessons
                    .iter()
                    .map(move |lesson| (lesson.id.clone(), module.id.clone()))
            })
            .collect()
    }

    /// Human-readable 1-based position used by drag overlays.
    #[must_use]
    pub fn position_label(&self, lesson: &LessonId) -> Option<String> {
        let location = self.locate_lesson(lesson)?;
        Some(format!(
            "Module {} · Lesson {}",
            location.module_index + 1,
            location.lesson_index + 1
        ))
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), SyllabusError> {
        let mut modules = BTreeSet::new();
        let mut lessons: BTreeMap<&LessonId, &ModuleId> = BTreeMap::new();
        for module in &self.modules {
            if module.id.is_empty() {
                return Err(SyllabusError::EmptyModuleId);
            }
            if !modules.insert(&module.id) {
                return Err(SyllabusError::DuplicateModule {
                    module: module.id.clone(),
                });
            }
            for lesson in &module.lessons {
                if lesson.id.is_empty() {
                    return Err(SyllabusError::EmptyLessonId {
                        module: module.id.clone(),
                    });
                }
                if let Some(prefix) = reserved_prefix(lesson.id.as_str()) {
                    return Err(SyllabusError::ReservedId {
                        lesson: lesson.id.clone(),
                        module: module.id.clone(),
                        prefix,
                    });
                }
                if let Some(first) = lessons.insert(&lesson.id, &module.id) {
                    return Err(SyllabusError::DuplicateLesson {
                        lesson: lesson.id.clone(),
                        first: first.clone(),
                        second: module.id.clone(),
                    });
                }
            }
        }
        let mut resources = BTreeSet::new();
        for resource in &self.resources {
            if resource.id.is_empty() {
                return Err(SyllabusError::EmptyResourceId);
            }
            if !resources.insert(&resource.id) {
                return Err(SyllabusError::DuplicateResource {
                    resource: resource.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Deterministic FNV-1a hash over ids, titles, and order.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                *hash ^= u64::from(*byte);
                *hash = hash.wrapping_mul(PRIME);
            }
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_bytes(hash, &(value.len() as u64).to_le_bytes());
            mix_bytes(hash, value.as_bytes());
        }

        let mut hash = OFFSET_BASIS;
        mix_bytes(&mut hash, &(self.modules.len() as u64).to_le_bytes());
        for module in &self.modules {
            mix_str(&mut hash, module.id.as_str());
            mix_str(&mut hash, &module.title);
            mix_bytes(&mut hash, &(module.lessons.len() as u64).to_le_bytes());
            for lesson in &module.lessons {
                mix_str(&mut hash, lesson.id.as_str());
                mix_str(&mut hash, &lesson.title);
                mix_str(&mut hash, lesson.kind().as_str());
            }
        }
        mix_bytes(&mut hash, &(self.resources.len() as u64).to_le_bytes());
        for resource in &self.resources {
            mix_str(&mut hash, resource.id.as_str());
            mix_str(&mut hash, &resource.title);
        }
        hash
    }
}

/// Structural invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyllabusError {
    EmptyModuleId,
    EmptyLessonId {
        module: ModuleId,
    },
    EmptyResourceId,
    DuplicateModule {
        module: ModuleId,
    },
    DuplicateLesson {
        lesson: LessonId,
        first: ModuleId,
        second: ModuleId,
    },
    DuplicateResource {
        resource: ResourceId,
    },
    /// Lesson id starts with a framework prefix and would not decode as a lesson.
    ReservedId {
        lesson: LessonId,
        module: ModuleId,
        prefix: &'static str,
    },
}

impl fmt::Display for SyllabusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModuleId => write!(f, "module id must not be empty"),
            Self::EmptyLessonId { module } => {
                write!(f, "module {module} contains a lesson with an empty id")
            }
            Self::EmptyResourceId => write!(f, "resource id must not be empty"),
            Self::DuplicateModule { module } => write!(f, "duplicate module id {module}"),
            Self::DuplicateLesson {
                lesson,
                first,
                second,
            } => write!(
                f,
                "lesson {lesson} appears in both module {first} and module {second}"
            ),
            Self::DuplicateResource { resource } => write!(f, "duplicate resource id {resource}"),
            Self::ReservedId {
                lesson,
                module,
                prefix,
            } => write!(
                f,
                "lesson {lesson} in module {module} uses reserved prefix {prefix:?}"
            ),
        }
    }
}

impl std::error::Error for SyllabusError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_module_syllabus() -> Syllabus {
        Syllabus::new(vec![
            Module::new("intro", "Intro")
                .with_lesson(Lesson::video("L1", "Welcome"))
                .with_lesson(Lesson::article("L2", "Setup")),
            Module::new("core", "Core").with_lesson(Lesson::quiz("L3", "Deep Dive")),
        ])
    }

    #[test]
    fn locate_lesson_reports_module_and_slot() {
        let syllabus = two_module_syllabus();
        assert_eq!(
            syllabus.locate_lesson(&LessonId::from("L2")),
            Some(LessonLocation {
                module_index: 0,
                lesson_index: 1
            })
        );
        assert_eq!(
            syllabus.locate_lesson(&LessonId::from("L3")),
            Some(LessonLocation {
                module_index: 1,
                lesson_index: 0
            })
        );
        assert_eq!(syllabus.locate_lesson(&LessonId::from("nope")), None);
    }

    #[test]
    fn module_of_and_lesson_lookup() {
        let syllabus = two_module_syllabus();
        let module = syllabus.module_of(&LessonId::from("L3")).expect("owner");
        assert_eq!(module.id, ModuleId::from("core"));
        let lesson = syllabus.lesson(&LessonId::from("L1")).expect("lesson");
        assert_eq!(lesson.kind(), LessonKind::Video);
    }

    #[test]
    fn position_label_is_one_based() {
        let syllabus = two_module_syllabus();
        assert_eq!(
            syllabus.position_label(&LessonId::from("L3")).as_deref(),
            Some("Module 2 · Lesson 1")
        );
    }

    #[test]
    fn validate_accepts_well_formed_syllabus() {
        assert_eq!(two_module_syllabus().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_duplicate_lesson_across_modules() {
        let mut syllabus = two_module_syllabus();
        syllabus.modules[1]
            .lessons
            .push(Lesson::video("L1", "Welcome again"));
        assert_eq!(
            syllabus.validate(),
            Err(SyllabusError::DuplicateLesson {
                lesson: LessonId::from("L1"),
                first: ModuleId::from("intro"),
                second: ModuleId::from("core"),
            })
        );
    }

    #[test]
    fn validate_rejects_lesson_ids_with_framework_prefixes() {
        for (raw, prefix) in [
            ("resource-intro", "resource-"),
            ("module-zone-x", "module-zone-"),
            ("add-lesson-x", "add-lesson-"),
        ] {
            let mut syllabus = two_module_syllabus();
            syllabus.modules[0].lessons.push(Lesson::video(raw, "Clash"));
            assert_eq!(
                syllabus.validate(),
                Err(SyllabusError::ReservedId {
                    lesson: LessonId::from(raw),
                    module: ModuleId::from("intro"),
                    prefix,
                })
            );
        }

        // Resource and module ids are always encoded with their own prefix.
        let prefixed = Syllabus::new(vec![
            Module::new("resource-m", "M").with_lesson(Lesson::video("lesson-resource", "L")),
        ])
        .with_resources(vec![Resource::new("module-zone-r", "R")]);
        assert_eq!(prefixed.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_duplicate_module_and_empty_ids() {
        let mut syllabus = two_module_syllabus();
        syllabus.modules.push(Module::new("core", "Core 2"));
        assert!(matches!(
            syllabus.validate(),
            Err(SyllabusError::DuplicateModule { .. })
        ));

        let empty = Syllabus::new(vec![Module::new("", "Untitled")]);
        assert_eq!(empty.validate(), Err(SyllabusError::EmptyModuleId));

        let resources = Syllabus::default()
            .with_resources(vec![Resource::new("r", "a"), Resource::new("r", "b")]);
        assert!(matches!(
            resources.validate(),
            Err(SyllabusError::DuplicateResource { .. })
        ));
    }

    #[test]
    fn state_hash_tracks_order() {
        let syllabus = two_module_syllabus();
        let mut reordered = syllabus.clone();
        reordered.modules[0].lessons.swap(0, 1);
        assert_eq!(syllabus.state_hash(), two_module_syllabus().state_hash());
        assert_ne!(syllabus.state_hash(), reordered.state_hash());
    }

    #[test]
    fn membership_covers_every_lesson_once() {
        let membership = two_module_syllabus().membership();
        assert_eq!(membership.len(), 3);
        assert_eq!(membership[&LessonId::from("L2")], ModuleId::from("intro"));
    }

    #[test]
    fn lesson_payload_round_trips_through_json() {
        let syllabus = two_module_syllabus();
        let json = serde_json::to_string(&syllabus).expect("serialize");
        assert!(json.contains(r#""type":"video""#));
        let back: Syllabus = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, syllabus);
    }
}
