//! LocalStack test context and utilities.

use aws_sdk_s3::Client as S3Client;
use rf_s3::{RetryConfig, S3Config, S3Store};

/// LocalStack test context providing a raw S3 client for fixtures.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .endpoint_url(&endpoint)
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                "test", "test", None, None, "localstack",
            ))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is reachable.
    pub async fn is_available(&self) -> bool {
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Store under test, pointed at LocalStack.
    pub async fn store(&self, bucket: &str) -> S3Store {
        let config = S3Config::new(bucket)
            .with_endpoint(&self.endpoint)
            .with_region(&self.region)
            .with_credentials("test", "test");

        S3Store::from_config(&config)
            .await
            .unwrap()
            .with_retry_config(RetryConfig::new().with_initial_backoff_ms(10))
    }

    /// Create a bucket if it does not exist yet.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Upload an object.
    pub async fn put(&self, bucket: &str, key: &str, body: &str) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body.as_bytes().to_vec().into())
            .content_type("text/plain")
            .send()
            .await?;
        Ok(())
    }

    /// Upload `count` objects named `{prefix}{n:04}`.
    pub async fn put_numbered(
        &self,
        bucket: &str,
        prefix: &str,
        count: usize,
    ) -> Result<Vec<String>, aws_sdk_s3::Error> {
        let mut keys = Vec::with_capacity(count);
        for n in 1..=count {
            let key = format!("{prefix}{n:04}");
            self.put(bucket, &key, &format!("body of {key}")).await?;
            keys.push(key);
        }
        Ok(keys)
    }

    /// Delete every object under `prefix`.
    pub async fn clear_prefix(&self, bucket: &str, prefix: &str) -> Result<(), aws_sdk_s3::Error> {
        let listed = self
            .s3
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await?;

        for object in listed.contents() {
            if let Some(key) = object.key() {
                self.s3.delete_object().bucket(bucket).key(key).send().await?;
            }
        }
        Ok(())
    }
}
