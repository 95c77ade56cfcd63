//! Database engine tests

mod property_tests;
