pub mod lms;
