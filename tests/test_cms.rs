
use {
    anyhow::{anyhow as err, ensure, Result},
    asn1_catalog::{
        modules::{
            cmp_algorithms, cms as cms_module, kem_recipient, key_derivation, pkix, private_keys,
            rpki,
        },
        Oid, OpenValue, SchemaCatalog, Value,
    },
    cms::{content_info::ContentInfo, enveloped_data::EnvelopedData, signed_data::SignedData},
    dataset::Dataset,
    der::Decode,
    hex_literal::hex,
};

/// Decode a `ContentInfo` and check that it re-encodes to the same bytes.
fn content_info(catalog: &SchemaCatalog, der: &[u8]) -> Result<Value> {
    let schema = catalog.schema("cms.ContentInfo")?;
    let value = catalog.decode_exact(der, &schema)?;
    ensure!(catalog.encode(&value, &schema)? == der, "content info does not round-trip");
    let content = value
        .as_fields()
        .and_then(|fields| fields.get("content"))
        .ok_or_else(|| err!("content missing"))?;
    ensure!(content.is_resolved(), "content type was not resolved");
    Ok(value)
}

#[test]
fn test_route_origin_authorization() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let value = content_info(&catalog, &dataset.roa)?;
    let signed_data = value.get("content").ok_or_else(|| err!("no content"))?;

    assert_eq!(signed_data.get("version").and_then(Value::as_i64), Some(3));
    assert_eq!(
        signed_data.get("encapContentInfo.eContentType").and_then(Value::as_oid),
        Some(rpki::ID_CT_ROUTE_ORIGIN_AUTHZ)
    );
    let roa = signed_data
        .get("encapContentInfo.eContent")
        .ok_or_else(|| err!("no encapsulated content"))?;
    assert_eq!(roa.get("version").and_then(Value::as_i64), Some(0));
    assert_eq!(roa.get("asID").and_then(Value::as_i64), Some(15562));
    assert_eq!(
        roa.get("ipAddrBlocks[0].addressFamily").and_then(Value::as_bytes),
        Some(&hex!("0002")[..])
    );
    assert_eq!(
        roa.get("ipAddrBlocks[0].addresses[0].address").and_then(Value::as_bytes),
        Some(&hex!("2001067c208c")[..])
    );
    assert!(roa.get("ipAddrBlocks[0].addresses[0].maxLength").is_none());

    // The EE certificate carries the resources.
    let extensions = signed_data
        .get("certificates[0].certificate.tbsCertificate.extensions")
        .and_then(Value::as_list)
        .ok_or_else(|| err!("no EE certificate"))?;
    let ip_blocks = extensions
        .iter()
        .find(|ext| ext.get("extnID").and_then(Value::as_oid) == Some(rpki::ID_PE_IP_ADDR_BLOCKS))
        .ok_or_else(|| err!("no IP address blocks"))?;
    assert_eq!(
        ip_blocks
            .get("extnValue[0].ipAddressChoice.addressesOrRanges[1].addressPrefix")
            .and_then(Value::as_bytes),
        Some(&hex!("2a0eb2400000")[..])
    );

    // Signed attributes resolve through the CMS attribute registry.
    assert_eq!(
        signed_data.get("signerInfos[0].signedAttrs[0].attrType").and_then(Value::as_oid),
        Some(cms_module::ID_CONTENT_TYPE)
    );
    assert_eq!(
        signed_data.get("signerInfos[0].signedAttrs[0].attrValues[0]").and_then(Value::as_oid),
        Some(rpki::ID_CT_ROUTE_ORIGIN_AUTHZ)
    );

    let reference = ContentInfo::from_der(&dataset.roa)?;
    let reference: SignedData = reference.content.decode_as()?;
    assert_eq!(
        signed_data.get("signerInfos").and_then(Value::as_list).map(<[_]>::len),
        Some(reference.signer_infos.0.len())
    );
    Ok(())
}

#[test]
fn test_signed_trust_anchor_key() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let value = content_info(&catalog, &dataset.signed_tal)?;

    assert_eq!(
        value.get("content.encapContentInfo.eContentType").and_then(Value::as_oid),
        Some(rpki::ID_CT_SIGNED_TAL)
    );
    let tak = value
        .get("content.encapContentInfo.eContent")
        .ok_or_else(|| err!("no encapsulated content"))?;
    assert_eq!(tak.get("version").and_then(Value::as_i64), Some(0));
    assert_eq!(tak.get("current.comments[0]").and_then(Value::as_str), Some("My nice TA"));
    let uris: Vec<_> = tak
        .get("current.certificateURIs")
        .and_then(Value::as_list)
        .ok_or_else(|| err!("no certificate URIs"))?
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(
        uris,
        ["https://example.com/ta.cer", "rsync://example.com/rsync/ta.cer"]
    );
    assert_eq!(
        tak.get("current.subjectPublicKeyInfo.algorithm.algorithm").and_then(Value::as_oid),
        Some(pkix::RSA_ENCRYPTION)
    );
    assert!(tak.get("predecessor").is_some());
    assert!(tak.get("successor").is_some());
    Ok(())
}

#[test]
fn test_kem_recipient_info() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let value = content_info(&catalog, &dataset.kem_enveloped_data)?;

    let enveloped_data = value.get("content").ok_or_else(|| err!("no content"))?;
    assert_eq!(enveloped_data.get("version").and_then(Value::as_i64), Some(3));
    assert_eq!(
        enveloped_data.get("encryptedContentInfo.contentType").and_then(Value::as_oid),
        Some(cms_module::ID_DATA)
    );

    let ori = enveloped_data
        .get("recipientInfos[0].ori")
        .ok_or_else(|| err!("no other recipient info"))?;
    assert_eq!(ori.get("oriType").and_then(Value::as_oid), Some(kem_recipient::ID_ORI_KEM));
    ensure!(
        ori.as_fields()
            .and_then(|fields| fields.get("oriValue"))
            .is_some_and(Value::is_resolved),
        "KEMRecipientInfo was not resolved"
    );

    let kem = ori.get("oriValue").ok_or_else(|| err!("no oriValue"))?;
    assert_eq!(kem.get("version").and_then(Value::as_i64), Some(0));
    assert_eq!(
        kem.get("rid.subjectKeyIdentifier").and_then(Value::as_bytes),
        Some(&hex!("9eeb67c9b95a74d44d2f16396680e801b5cba49c")[..])
    );
    assert_eq!(
        kem.get("kem.algorithm").and_then(Value::as_oid),
        Some(Oid::new_unwrap("1.0.18033.2.2.4"))
    );
    assert_eq!(kem.get("kemct").and_then(Value::as_bytes).map(<[u8]>::len), Some(384));
    assert_eq!(kem.get("kdf.algorithm").and_then(Value::as_oid), Some(key_derivation::ID_KDF_KDF2));
    assert_eq!(
        kem.get("kdf.parameters.algorithm").and_then(Value::as_oid),
        Some(pkix::ID_SHA256)
    );
    assert_eq!(kem.get("kekLength").and_then(Value::as_i64), Some(16));
    assert!(kem.get("ukm").is_none());
    assert_eq!(
        kem.get("wrap.algorithm").and_then(Value::as_oid),
        Some(Oid::new_unwrap("2.16.840.1.101.3.4.1.5"))
    );

    // aes-128-cbc carries its IV as parameters.
    assert_eq!(
        enveloped_data
            .get("encryptedContentInfo.contentEncryptionAlgorithm.algorithm")
            .and_then(Value::as_oid),
        Some(cmp_algorithms::ID_AES128_CBC)
    );
    assert_eq!(
        enveloped_data
            .get("encryptedContentInfo.contentEncryptionAlgorithm.parameters")
            .and_then(Value::as_bytes),
        Some(&hex!("480ccafebabefacedbaddecaf8887781")[..])
    );

    let reference = ContentInfo::from_der(&dataset.kem_enveloped_data)?;
    let reference: EnvelopedData = reference.content.decode_as()?;
    assert_eq!(reference.recip_infos.0.len(), 1);
    Ok(())
}

#[test]
fn test_one_asymmetric_key() -> Result<()> {
    let dataset = Dataset::load()?;
    let catalog = dataset::catalog()?;
    let value = content_info(&catalog, &dataset.private_key_info)?;

    assert_eq!(
        value.get("contentType").and_then(Value::as_oid),
        Some(private_keys::ID_CT_ONE_ASYMMETRIC_KEY)
    );
    let key = value.get("content").ok_or_else(|| err!("no content"))?;
    assert_eq!(key.get("version").and_then(Value::as_i64), Some(1));
    assert_eq!(
        key.get("privateKeyAlgorithm.algorithm").and_then(Value::as_oid),
        Some(Oid::new_unwrap("1.3.101.112"))
    );
    assert_eq!(key.get("privateKey").and_then(Value::as_bytes).map(<[u8]>::len), Some(34));
    assert_eq!(key.get("publicKey").and_then(Value::as_bytes).map(<[u8]>::len), Some(32));

    // No schema is registered for this attribute, so its value stays raw.
    assert_eq!(
        key.get("attributes[0].attrType").and_then(Value::as_oid),
        Some(Oid::new_unwrap("1.2.840.113549.1.9.9.20"))
    );
    let attribute_value = key
        .get("attributes[0].attrValues[0]")
        .ok_or_else(|| err!("attribute has no value"))?;
    ensure!(
        matches!(attribute_value, Value::Open(OpenValue::Raw(_))),
        "unregistered attribute was resolved"
    );
    Ok(())
}
