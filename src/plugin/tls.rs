//! AutoMTLS server certificate
//!
//! When Terraform negotiates AutoMTLS it passes its own certificate in
//! `PLUGIN_CLIENT_CERT` and expects the plugin to answer with a freshly
//! generated certificate in the handshake line.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose,
    IsCa, KeyPair, KeyUsagePurpose,
};
use tonic::transport::{Identity, ServerTlsConfig};

use crate::error::Result;

/// Self-signed certificate served for one plugin process
#[derive(Debug, Clone)]
pub struct ServerCertificate {
    cert_pem: String,
    key_pem: String,
    der: Vec<u8>,
}

impl ServerCertificate {
    pub fn generate() -> Result<Self> {
        let mut params = CertificateParams::new(vec!["localhost".to_string()])?;

        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, "HashiCorp");
        dn.push(DnType::CommonName, "localhost");
        params.distinguished_name = dn;

        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
            KeyUsagePurpose::KeyCertSign,
        ];
        params.extended_key_usages = vec![
            ExtendedKeyUsagePurpose::ServerAuth,
            ExtendedKeyUsagePurpose::ClientAuth,
        ];

        let key_pair = KeyPair::generate()?;
        let cert = params.self_signed(&key_pair)?;

        Ok(Self {
            cert_pem: cert.pem(),
            key_pem: key_pair.serialize_pem(),
            der: cert.der().to_vec(),
        })
    }

    /// DER certificate as it appears in the handshake line
    pub fn handshake_value(&self) -> String {
        STANDARD_NO_PAD.encode(&self.der)
    }

    pub fn tls_config(&self) -> ServerTlsConfig {
        ServerTlsConfig::new().identity(Identity::from_pem(&self.cert_pem, &self.key_pem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_certificate() {
        let cert = ServerCertificate::generate().unwrap();
        assert!(cert.cert_pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert!(cert.key_pem.contains("PRIVATE KEY"));
    }

    #[test]
    fn test_handshake_value_is_unpadded_der() {
        let cert = ServerCertificate::generate().unwrap();
        let value = cert.handshake_value();

        assert!(!value.ends_with('='));
        assert_eq!(STANDARD_NO_PAD.decode(&value).unwrap(), cert.der);
    }

    #[test]
    fn test_certificates_are_unique() {
        let a = ServerCertificate::generate().unwrap();
        let b = ServerCertificate::generate().unwrap();
        assert_ne!(a.der, b.der);
    }
}
