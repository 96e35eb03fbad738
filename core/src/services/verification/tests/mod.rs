mod mocks;
mod service_tests;
mod store_tests;
