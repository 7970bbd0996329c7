//! Extracts faculty listings, degree requirements and course-list links from
//! college areas-of-study pages, and courses from the linked course lists.

pub mod fetch;
pub mod index;
pub mod parser;
pub mod record;
pub mod settings;

pub use fetch::FetchError;
pub use parser::courses::{parse_course_list, CourseAttrs, CourseList, ParsedCourse, PrereqHint};
pub use parser::{extract_program, parse_program_page};
pub use record::{FacultyEntry, ProgramRecord, RequirementsMap};
pub use settings::Settings;
