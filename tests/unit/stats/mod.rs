//! Unit tests for stats modules
