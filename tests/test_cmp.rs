
use {
    anyhow::{anyhow as err, ensure, Result},
    asn1_catalog::{
        modules::{self, cmp, cmp_algorithms, pkix},
        registry::{ALGORITHM_IDENTIFIERS, SMIME_CAPABILITIES},
        CatalogConfig, Error, Oid, SchemaCatalog, Value,
    },
    cms::cert::x509::{certificate::Version, Certificate},
    dataset::{tlv, Dataset},
    der::{Decode, Tag, TagNumber},
};

const HMAC_SHA256: Oid = Oid::new_unwrap("1.3.6.1.5.5.8.1.2");

fn message(catalog: &SchemaCatalog, der: &[u8]) -> Result<Value> {
    let schema = catalog.schema("cmp.PKIMessage")?;
    let value = catalog.decode_exact(der, &schema)?;
    ensure!(catalog.encode(&value, &schema)? == der, "message does not round-trip");
    Ok(value)
}

#[test]
fn test_cert_conf_message() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let value = message(&catalog, &dataset.cmp_cert_conf)?;

    let header = value.get("header").ok_or_else(|| err!("no header"))?;
    assert_eq!(header.get("pvno").and_then(Value::as_i64), Some(3));
    assert_eq!(
        header
            .get("sender.directoryName.rdnSequence[0][0].value.printableString")
            .and_then(Value::as_str),
        Some("test1")
    );
    assert_eq!(
        header
            .get("recipient.directoryName.rdnSequence[2][0].value.utf8String")
            .and_then(Value::as_str),
        Some("Insta Demo CA")
    );
    assert_eq!(header.get("messageTime").and_then(Value::as_str), Some("20210806093113Z"));
    assert_eq!(header.get("senderKID").and_then(Value::as_bytes), Some(&b"3078"[..]));
    assert!(header.get("recipKID").is_none());
    assert!(header.get("generalInfo").is_none());

    // Password based MAC parameters resolve through the algorithm registry.
    assert_eq!(
        header.get("protectionAlg.algorithm").and_then(Value::as_oid),
        Some(cmp::ID_PASSWORD_BASED_MAC)
    );
    let parameters = header
        .get("protectionAlg.parameters")
        .ok_or_else(|| err!("no PBM parameters"))?;
    assert_eq!(parameters.get("salt").and_then(Value::as_bytes).map(<[u8]>::len), Some(16));
    assert_eq!(parameters.get("owf.algorithm").and_then(Value::as_oid), Some(pkix::ID_SHA256));
    assert_eq!(parameters.get("iterationCount").and_then(Value::as_i64), Some(500));
    assert_eq!(parameters.get("mac.algorithm").and_then(Value::as_oid), Some(HMAC_SHA256));

    let (alternative, _) = value
        .get("body")
        .and_then(Value::as_choice)
        .ok_or_else(|| err!("body is not a choice"))?;
    assert_eq!(alternative, "certConf");
    let status = value
        .get("body.certConf[0]")
        .ok_or_else(|| err!("no certificate status"))?;
    assert_eq!(status.get("hashAlg.algorithm").and_then(Value::as_oid), Some(pkix::ID_SHA256));
    assert_eq!(status.get("certHash").and_then(Value::as_bytes).map(<[u8]>::len), Some(32));
    assert_eq!(status.get("certReqId").and_then(Value::as_i64), Some(0));
    assert_eq!(status.get("statusInfo.status").and_then(Value::as_i64), Some(0));

    assert_eq!(value.get("protection").and_then(Value::as_bytes).map(<[u8]>::len), Some(20));
    assert!(value.get("extraCerts").is_none());
    Ok(())
}

#[test]
fn test_cert_rep_message() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let value = message(&catalog, &dataset.cmp_cert_rep)?;

    assert_eq!(value.get("header.pvno").and_then(Value::as_i64), Some(2));
    assert_eq!(value.get("header.protectionAlg.parameters"), Some(&Value::Null));

    let response = value.get("body.cp").ok_or_else(|| err!("not a certification response"))?;
    let ca_pubs = response
        .get("caPubs")
        .and_then(Value::as_list)
        .ok_or_else(|| err!("no CA certificates"))?;
    assert_eq!(ca_pubs.len(), 3);

    // Every CA certificate re-encodes to its original bytes and agrees with an
    // independent parser. The last one is a v1 certificate without a version
    // field.
    let certificate = catalog.schema("pkix.Certificate")?;
    let mut versions = Vec::new();
    for ca_pub in ca_pubs {
        let ca = ca_pub
            .get("x509v3PKCert")
            .ok_or_else(|| err!("not an X.509 certificate"))?;
        let der = catalog.encode(ca, &certificate)?;
        ensure!(
            dataset.cmp_cert_rep.windows(der.len()).any(|window| window == der),
            "CA certificate does not re-encode to its original bytes"
        );
        let reference = Certificate::from_der(&der)?;
        let version = ca
            .get("tbsCertificate.version")
            .and_then(Value::as_i64)
            .ok_or_else(|| err!("no version"))?;
        assert_eq!(version, reference.tbs_certificate.version as i64);
        versions.push(reference.tbs_certificate.version);
    }
    assert_eq!(versions, [Version::V3, Version::V3, Version::V1]);

    assert_eq!(response.get("response[0].certReqId").and_then(Value::as_i64), Some(0));
    assert_eq!(response.get("response[0].status.status").and_then(Value::as_i64), Some(0));
    let issued = response
        .get("response[0].certifiedKeyPair.certOrEncCert.certificate.x509v3PKCert")
        .ok_or_else(|| err!("no issued certificate"))?;
    assert!(issued.get("tbsCertificate.subjectPublicKeyInfo").is_some());
    assert!(response.get("response[0].certifiedKeyPair.privateKey").is_none());
    Ok(())
}

#[test]
fn test_algorithm_capabilities() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let schema = catalog.schema("cms.SMIMECapabilities")?;
    let der = &dataset.cmp_algorithm_capabilities;
    let value = catalog.decode_exact(der, &schema)?;
    assert_eq!(&catalog.encode(&value, &schema)?, der);

    let capabilities = value.as_list().ok_or_else(|| err!("not a list"))?;
    assert_eq!(capabilities.len(), 31);
    let algorithms = catalog.registry(ALGORITHM_IDENTIFIERS);
    let smime = catalog.registry(SMIME_CAPABILITIES);
    let mut parameterized = Vec::new();
    for capability in capabilities {
        let id = capability
            .get("capabilityID")
            .and_then(Value::as_oid)
            .ok_or_else(|| err!("no capability id"))?;
        let Some(parameters) = capability.as_fields().and_then(|fields| fields.get("parameters"))
        else {
            continue;
        };
        ensure!(parameters.is_resolved(), "parameters of {id} were not resolved");
        ensure!(algorithms.contains(&id) && smime.contains(&id), "{id} is not registered");
        parameterized.push(id);
    }
    assert_eq!(parameterized, [
        cmp_algorithms::ID_ALG_ESDH,
        cmp_algorithms::DH_SINGLE_PASS_STD_DH_SHA512KDF_SCHEME,
        cmp_algorithms::DH_SINGLE_PASS_COFACTOR_DH_SHA256KDF_SCHEME,
        cmp_algorithms::MQV_SINGLE_PASS_SHA512KDF_SCHEME,
    ]);

    // aes256-wrap
    assert_eq!(
        capabilities[12].get("parameters.algorithm").and_then(Value::as_oid),
        Some(Oid::new_unwrap("2.16.840.1.101.3.4.1.45"))
    );
    Ok(())
}

#[test]
fn test_nested_message() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let inner = message(&catalog, &dataset.cmp_cert_conf)?;
    let header = catalog.encode(
        inner.get("header").ok_or_else(|| err!("no header"))?,
        &catalog.schema("cmp.PKIHeader")?,
    )?;

    // nested [20] PKIMessages holding the certConf message
    let nested = Tag::ContextSpecific {
        constructed: true,
        number:      TagNumber::N20,
    };
    let body = tlv(nested, &tlv(Tag::Sequence, &dataset.cmp_cert_conf)?)?;
    let der = tlv(Tag::Sequence, &[header, body].concat())?;
    let value = message(&catalog, &der)?;

    let nested = value
        .get("body.nested")
        .and_then(Value::as_list)
        .ok_or_else(|| err!("not a nested message"))?;
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0], inner);
    assert_eq!(
        value.get("body.nested[0].body.certConf[0].certReqId").and_then(Value::as_i64),
        Some(0)
    );
    Ok(())
}

#[test]
fn test_depth_limit() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = SchemaCatalog::with_config(CatalogConfig {
        max_depth: 4,
        ..CatalogConfig::default()
    });
    modules::load(&catalog, &["cmp"])?;
    let schema = catalog.schema("cmp.PKIMessage")?;
    ensure!(
        matches!(
            catalog.decode_exact(&dataset.cmp_cert_conf, &schema),
            Err(Error::DepthExceeded { limit: 4, .. })
        ),
        "decoding should stop at the depth limit"
    );
    Ok(())
}
