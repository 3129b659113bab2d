mod common;
mod kubectl_tests;
mod scan_tests;
