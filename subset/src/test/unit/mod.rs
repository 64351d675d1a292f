pub mod algebra;
