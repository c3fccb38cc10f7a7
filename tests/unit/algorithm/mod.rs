//! Unit tests for the strict and rescue passes
