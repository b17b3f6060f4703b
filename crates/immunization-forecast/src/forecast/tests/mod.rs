mod common;
mod influenza;
mod rules;
