use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::SourceError;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Signs requests with AWS Signature Version 4.
///
/// Only requests to the root path without a query string are supported, which
/// is all the JSON protocol needs.
pub struct Signer<'a> {
    pub credentials: &'a Credentials,
    pub region: &'a str,
    pub service: &'a str,
}

impl<'a> Signer<'a> {
    /// Returns the headers to add to the request: `x-amz-date`, the session
    /// token when there is one, and `authorization`.
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        headers: &[(&str, &str)],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, SourceError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let mut extra = vec![("x-amz-date".to_string(), amz_date.clone())];
        if let Some(token) = &self.credentials.session_token {
            extra.push(("x-amz-security-token".to_string(), token.clone()));
        }

        let mut canonical: Vec<(String, String)> = headers
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
            .chain(std::iter::once(("host".to_string(), host.to_string())))
            .chain(extra.iter().cloned())
            .collect();
        canonical.sort();

        let signed_headers = canonical
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let canonical_headers: String = canonical
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();
        let canonical_request = format!(
            "{}\n/\n\n{}\n{}\n{}",
            method,
            canonical_headers,
            signed_headers,
            hex::encode(Sha256::digest(body))
        );

        let scope = format!("{}/{}/{}/aws4_request", date, self.region, self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );
        let signature = hex::encode(hmac(
            &self.signing_key(&date)?,
            string_to_sign.as_bytes(),
        )?);

        extra.push((
            "authorization".to_string(),
            format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.credentials.access_key_id, scope, signed_headers, signature
            ),
        ));
        Ok(extra)
    }

    fn signing_key(&self, date: &str) -> Result<Vec<u8>, SourceError> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let key = hmac(secret.as_bytes(), date.as_bytes())?;
        let key = hmac(&key, self.region.as_bytes())?;
        let key = hmac(&key, self.service.as_bytes())?;
        hmac(&key, b"aws4_request")
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SourceError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| SourceError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
pub mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Credentials, Signer};

    fn example_credentials(session_token: Option<&str>) -> Credentials {
        Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: session_token.map(str::to_string),
        }
    }

    #[test]
    fn test_signing_key() {
        let credentials = example_credentials(None);
        let signer = Signer {
            credentials: &credentials,
            region: "us-east-1",
            service: "iam",
        };
        assert_eq!(
            hex::encode(signer.signing_key("20120215").unwrap()),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_sign_get_vanilla() {
        let credentials = example_credentials(None);
        let signer = Signer {
            credentials: &credentials,
            region: "us-east-1",
            service: "service",
        };
        let now = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        let headers = signer
            .sign("GET", "example.amazonaws.com", &[], b"", now)
            .unwrap();
        assert_eq!(
            headers,
            vec![
                ("x-amz-date".to_string(), "20150830T123600Z".to_string()),
                (
                    "authorization".to_string(),
                    "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
                     SignedHeaders=host;x-amz-date, \
                     Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
                        .to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_sign_includes_session_token() {
        let credentials = example_credentials(Some("token"));
        let signer = Signer {
            credentials: &credentials,
            region: "eu-west-1",
            service: "monitoring",
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let headers = signer
            .sign(
                "POST",
                "monitoring.eu-west-1.amazonaws.com",
                &[("Content-Type", "application/x-amz-json-1.0")],
                b"{}",
                now,
            )
            .unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(
            headers[1],
            ("x-amz-security-token".to_string(), "token".to_string())
        );
        let (name, authorization) = &headers[2];
        assert_eq!(name, "authorization");
        assert!(authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240102/eu-west-1/monitoring/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date;x-amz-security-token, Signature="
        ));
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = example_credentials(Some("token"));
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("EXAMPLEKEY"));
        assert!(!debug.contains("token"));
    }
}
