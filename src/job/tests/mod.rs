//! Unit tests for the job domain.

mod category_tests;
