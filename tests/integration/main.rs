//! Integration tests for rangeflow.
//!
//! The in-memory tests always run. The S3 tests need LocalStack and are
//! marked `#[ignore]`.
//!
//! ## Running the LocalStack tests
//!
//! 1. Start LocalStack:
//!    ```bash
//!    docker run -d -p 4566:4566 localstack/localstack
//!    ```
//!
//! 2. Run the ignored tests:
//!    ```bash
//!    LOCALSTACK_ENDPOINT=http://localhost:4566 cargo test -p integration-tests -- --ignored
//!    ```

mod common;
mod memory_test;
mod s3_test;
