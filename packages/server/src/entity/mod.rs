pub mod forum;
pub mod forum_member;
pub mod forum_topic;
pub mod problem;
pub mod problem_import;
pub mod test_case;
