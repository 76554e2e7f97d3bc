mod submission;
mod validation;
