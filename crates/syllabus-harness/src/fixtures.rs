#![forbid(unsafe_code)]

//! Reference syllabi and framework id helpers.

use syllabus_core::{
    ADD_LESSON_PREFIX, Lesson, MODULE_ZONE_PREFIX, Module, RESOURCE_ID_PREFIX, Resource, Syllabus,
};

/// Intro `[L1, L2]`, Core `[L3]`, two resources.
#[must_use]
pub fn intro_core() -> Syllabus {
    Syllabus::new(vec![
        Module::new("Intro", "Introduction")
            .with_lesson(Lesson::video("L1", "Welcome"))
            .with_lesson(Lesson::article("L2", "Course setup")),
        Module::new("Core", "Core concepts").with_lesson(Lesson::quiz("L3", "Checkpoint")),
    ])
    .with_resources(vec![
        Resource::new("slides", "Slide deck"),
        Resource::new("workbook", "Workbook"),
    ])
}

/// [`intro_core`] plus an empty trailing module `Extra`.
#[must_use]
pub fn with_empty_module() -> Syllabus {
    let mut syllabus = intro_core();
    syllabus.modules.push(Module::new("Extra", "Extra credit"));
    syllabus
}

/// One module `M` with lessons `[A, B, C, D]`.
#[must_use]
pub fn single_module() -> Syllabus {
    let mut module = Module::new("M", "Only module");
    for id in ["A", "B", "C", "D"] {
        module = module.with_lesson(Lesson::video(id, format!("Lesson {id}")));
    }
    Syllabus::new(vec![module])
}

/// `M1 [A, B]`, `M2 [C, D]`.
#[must_use]
pub fn two_modules() -> Syllabus {
    Syllabus::new(vec![
        Module::new("M1", "First")
            .with_lesson(Lesson::video("A", "A"))
            .with_lesson(Lesson::video("B", "B")),
        Module::new("M2", "Second")
            .with_lesson(Lesson::video("C", "C"))
            .with_lesson(Lesson::video("D", "D")),
    ])
}

/// Generated syllabus: module `i` is `m{i}` with lessons `m{i}-l{j}`.
///
/// Lesson kinds rotate video, quiz, article. Resources are `r{k}`.
#[must_use]
pub fn generated(module_sizes: &[usize], resources: usize) -> Syllabus {
    let modules = module_sizes
        .iter()
        .enumerate()
        .map(|(m, &size)| {
            let mut module = Module::new(format!("m{m}"), format!("Module {m}"));
            for l in 0..size {
                let id = format!("m{m}-l{l}");
                let title = format!("Lesson {l} of module {m}");
                module = module.with_lesson(match l % 3 {
                    0 => Lesson::video(id, title),
                    1 => Lesson::quiz(id, title),
                    _ => Lesson::article(id, title),
                });
            }
            module
        })
        .collect();
    let resources = (0..resources)
        .map(|k| Resource::new(format!("r{k}"), format!("Resource {k}")))
        .collect();
    Syllabus::new(modules).with_resources(resources)
}

/// Framework ids of everything that can be dragged.
#[must_use]
pub fn draggable_ids(syllabus: &Syllabus) -> Vec<String> {
    let lessons = syllabus
        .modules
        .iter()
        .flat_map(|module| module.lessons.iter().map(|lesson| lesson.id.to_string()));
    let resources = syllabus
        .resources
        .iter()
        .map(|resource| format!("{RESOURCE_ID_PREFIX}{}", resource.id));
    lessons.chain(resources).collect()
}

/// Framework ids of every registered drop target.
#[must_use]
pub fn droppable_ids(syllabus: &Syllabus) -> Vec<String> {
    let mut ids = draggable_ids(syllabus);
    for module in &syllabus.modules {
        ids.push(format!("{MODULE_ZONE_PREFIX}{}", module.id));
        ids.push(format!("{ADD_LESSON_PREFIX}{}", module.id));
    }
    ids
}
