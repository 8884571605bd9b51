pub mod assignment;
pub mod shared;
pub mod student;
pub mod teacher;
