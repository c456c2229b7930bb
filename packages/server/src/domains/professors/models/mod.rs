mod professor;

pub use professor::{Professor, ProfessorDetail, Shift};
