mod common;
mod payload;
mod preclusion;
