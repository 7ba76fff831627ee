use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

/// Body, key and content encoding for one S3 object.
#[derive(Debug)]
pub struct S3Payload {
    pub key: String,
    pub body: Vec<u8>,
    pub content_encoding: Option<&'static str>,
}

/// Prepares a JSON body for upload, gzip-compressing it and suffixing the key with `.gz` when asked.
pub fn prepare_payload(key: &str, json: Vec<u8>, gzip: bool) -> Result<S3Payload> {
    if !gzip {
        return Ok(S3Payload {
            key: key.to_string(),
            body: json,
            content_encoding: None,
        });
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;

    Ok(S3Payload {
        key: format!("{key}.gz"),
        body: encoder.finish()?,
        content_encoding: Some("gzip"),
    })
}

/// Uploads a prepared JSON payload with `application/json` content type.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    payload: S3Payload,
) -> Result<()> {
    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(&payload.key)
        .body(payload.body.into())
        .content_type("application/json");

    if let Some(encoding) = payload.content_encoding {
        request = request.content_encoding(encoding);
    }

    request.send().await?;

    Ok(())
}
