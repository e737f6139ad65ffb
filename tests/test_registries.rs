
use {
    anyhow::{anyhow as err, ensure, Result},
    asn1_catalog::{
        get_registry,
        modules::{
            self, cert_extensions, cmp, cmp_algorithms, cms, crmf, csr_templates, kem_recipient,
            kem_rsa, key_derivation, ocsp, other_names, pkcs10, pkix, private_keys, related_certs,
            rpki,
        },
        registry::{
            ALGORITHM_IDENTIFIERS, CERTIFICATE_ATTRIBUTES, CERTIFICATE_EXTENSIONS, CMP_INFO_TYPES,
            CMS_ATTRIBUTES, CMS_CONTENT_TYPES, OCSP_RESPONSE_TYPES, OTHER_NAMES,
            OTHER_RECIPIENT_INFO, SMIME_CAPABILITIES,
        },
        CatalogConfig, Error, Leniency, Oid, OidExt, OpenValue, SchemaCatalog, SchemaNode, Value,
    },
    hex_literal::hex,
    std::{
        collections::{BTreeMap, BTreeSet},
        thread,
    },
};

/// Registrations of each module, per registry.
type Registrations = &'static [(&'static str, &'static [Oid])];

const PKIX: Registrations = &[
    (CERTIFICATE_EXTENSIONS, &[
        pkix::ID_CE_SUBJECT_KEY_IDENTIFIER,
        pkix::ID_CE_AUTHORITY_KEY_IDENTIFIER,
        pkix::ID_CE_KEY_USAGE,
        pkix::ID_CE_BASIC_CONSTRAINTS,
        pkix::ID_CE_EXT_KEY_USAGE,
        pkix::ID_CE_SUBJECT_ALT_NAME,
        pkix::ID_CE_ISSUER_ALT_NAME,
        pkix::ID_CE_CRL_DISTRIBUTION_POINTS,
        pkix::ID_CE_CERTIFICATE_POLICIES,
        pkix::ID_PE_AUTHORITY_INFO_ACCESS,
        pkix::ID_PE_SUBJECT_INFO_ACCESS,
        pkix::ID_CE_CRL_NUMBER,
        pkix::ID_CE_CRL_REASONS,
    ]),
    (CERTIFICATE_ATTRIBUTES, &[
        pkix::ID_AT_NAME,
        pkix::ID_AT_SURNAME,
        pkix::ID_AT_GIVEN_NAME,
        pkix::ID_AT_INITIALS,
        pkix::ID_AT_GENERATION_QUALIFIER,
        pkix::ID_AT_COMMON_NAME,
        pkix::ID_AT_LOCALITY_NAME,
        pkix::ID_AT_STATE_OR_PROVINCE_NAME,
        pkix::ID_AT_ORGANIZATION_NAME,
        pkix::ID_AT_ORGANIZATIONAL_UNIT_NAME,
        pkix::ID_AT_TITLE,
        pkix::ID_AT_PSEUDONYM,
        pkix::ID_AT_COUNTRY_NAME,
        pkix::ID_AT_SERIAL_NUMBER,
        pkix::ID_AT_DN_QUALIFIER,
        pkix::ID_DOMAIN_COMPONENT,
        pkix::ID_EMAIL_ADDRESS,
    ]),
    (ALGORITHM_IDENTIFIERS, &[
        pkix::RSA_ENCRYPTION,
        pkix::MD2_WITH_RSA_ENCRYPTION,
        pkix::MD5_WITH_RSA_ENCRYPTION,
        pkix::SHA1_WITH_RSA_ENCRYPTION,
        pkix::SHA224_WITH_RSA_ENCRYPTION,
        pkix::SHA256_WITH_RSA_ENCRYPTION,
        pkix::SHA384_WITH_RSA_ENCRYPTION,
        pkix::SHA512_WITH_RSA_ENCRYPTION,
        pkix::ID_SHA1,
        pkix::ID_SHA224,
        pkix::ID_SHA256,
        pkix::ID_SHA384,
        pkix::ID_SHA512,
        pkix::ID_EC_PUBLIC_KEY,
    ]),
];

const CMS: Registrations = &[
    (CMS_CONTENT_TYPES, &[
        cms::ID_SIGNED_DATA,
        cms::ID_ENVELOPED_DATA,
        cms::ID_DIGESTED_DATA,
        cms::ID_ENCRYPTED_DATA,
    ]),
    (CMS_ATTRIBUTES, &[
        cms::ID_CONTENT_TYPE,
        cms::ID_MESSAGE_DIGEST,
        cms::ID_SIGNING_TIME,
        cms::ID_COUNTERSIGNATURE,
        cms::ID_SMIME_CAPABILITIES,
    ]),
];

const PKCS10: Registrations = &[(CERTIFICATE_ATTRIBUTES, &[
    pkcs10::ID_EXTENSION_REQUEST,
    pkcs10::ID_CHALLENGE_PASSWORD,
])];

const CRMF: Registrations = &[(CMS_ATTRIBUTES, &[
    crmf::ID_REG_CTRL_REG_TOKEN,
    crmf::ID_REG_CTRL_AUTHENTICATOR,
    crmf::ID_REG_CTRL_PKI_PUBLICATION_INFO,
    crmf::ID_REG_CTRL_PKI_ARCHIVE_OPTIONS,
    crmf::ID_REG_CTRL_OLD_CERT_ID,
    crmf::ID_REG_CTRL_PROTOCOL_ENCR_KEY,
    crmf::ID_REG_INFO_UTF8_PAIRS,
    crmf::ID_REG_INFO_CERT_REQ,
])];

const CMP: Registrations = &[
    (CMP_INFO_TYPES, &[
        cmp::ID_IT_CA_PROT_ENC_CERT,
        cmp::ID_IT_SIGN_KEY_PAIR_TYPES,
        cmp::ID_IT_ENC_KEY_PAIR_TYPES,
        cmp::ID_IT_PREFERRED_SYMM_ALG,
        cmp::ID_IT_CA_KEY_UPDATE_INFO,
        cmp::ID_IT_CURRENT_CRL,
        cmp::ID_IT_UNSUPPORTED_OIDS,
        cmp::ID_IT_KEY_PAIR_PARAM_REQ,
        cmp::ID_IT_KEY_PAIR_PARAM_REP,
        cmp::ID_IT_REV_PASSPHRASE,
        cmp::ID_IT_IMPLICIT_CONFIRM,
        cmp::ID_IT_CONFIRM_WAIT_TIME,
        cmp::ID_IT_ORIG_PKI_MESSAGE,
        cmp::ID_IT_SUPP_LANG_TAGS,
        cmp::ID_IT_CA_CERTS,
        cmp::ID_IT_ROOT_CA_KEY_UPDATE,
        cmp::ID_IT_CERT_REQ_TEMPLATE,
        cmp::ID_IT_ROOT_CA_CERT,
        cmp::ID_IT_CERT_PROFILE,
        cmp::ID_IT_CRL_STATUS_LIST,
        cmp::ID_IT_CRLS,
    ]),
    (CMS_ATTRIBUTES, &[
        cmp::ID_REG_CTRL_ALT_CERT_TEMPLATE,
        cmp::ID_REG_CTRL_ALG_ID,
        cmp::ID_REG_CTRL_RSA_KEY_LEN,
    ]),
    (ALGORITHM_IDENTIFIERS, &[cmp::ID_PASSWORD_BASED_MAC, cmp::ID_DH_BASED_MAC]),
];

const CERT_EXTENSIONS: Registrations = &[(CERTIFICATE_EXTENSIONS, &[
    cert_extensions::ID_CE_NO_REV_AVAIL,
    cert_extensions::ID_PE_DELEGATION_USAGE,
])];

const RELATED_CERTS: Registrations = &[
    (CERTIFICATE_EXTENSIONS, &[related_certs::ID_PE_RELATED_CERT]),
    (CERTIFICATE_ATTRIBUTES, &[related_certs::ID_AA_RELATED_CERT_REQUEST]),
];

const OTHER_NAMES_MODULE: Registrations =
    &[(OTHER_NAMES, &[other_names::ID_ON_SMTP_UTF8_MAILBOX])];

const CSR_TEMPLATES: Registrations = &[
    (CMS_ATTRIBUTES, &[
        csr_templates::ID_REG_CTRL_ALT_CERT_TEMPLATE,
        csr_templates::ID_AC_TEMPLATE,
        csr_templates::ID_OPENPGP_CERT_TEMPLATE_EXT,
    ]),
    (CERTIFICATE_ATTRIBUTES, &[
        csr_templates::ID_AA_CERTIFICATION_REQUEST_INFO_TEMPLATE,
        csr_templates::ID_AA_EXTENSION_REQ_TEMPLATE,
        csr_templates::ID_AT_STATEMENT_OF_POSSESSION,
        csr_templates::ID_RDNA_UNSIGNED,
    ]),
];

const RPKI: Registrations = &[
    (CERTIFICATE_EXTENSIONS, &[
        rpki::ID_PE_IP_ADDR_BLOCKS,
        rpki::ID_PE_AUTONOMOUS_SYS_IDS,
        rpki::ID_PE_IP_ADDR_BLOCKS_V2,
        rpki::ID_PE_AUTONOMOUS_SYS_IDS_V2,
    ]),
    (CMS_CONTENT_TYPES, &[rpki::ID_CT_ROUTE_ORIGIN_AUTHZ, rpki::ID_CT_SIGNED_TAL]),
];

const KEM_RECIPIENT: Registrations = &[(OTHER_RECIPIENT_INFO, &[kem_recipient::ID_ORI_KEM])];

const PRIVATE_KEYS: Registrations = &[(CMS_CONTENT_TYPES, &[
    private_keys::ID_CT_KP_ASYMMETRIC_KEY_PACKAGE,
    private_keys::ID_CT_ONE_ASYMMETRIC_KEY,
    private_keys::ID_CT_ENCRYPTED_PRIVATE_KEY_INFO,
])];

const KEY_DERIVATION_ALGORITHMS: &[Oid] = &[
    key_derivation::ID_PBKDF2,
    key_derivation::ID_PBES2,
    key_derivation::ID_PBMAC1,
    key_derivation::ID_ALG_CEK_HKDF_SHA256,
    key_derivation::ID_KDF_KDF2,
    key_derivation::ID_KDF_KDF3,
    key_derivation::ID_KMAC128,
    key_derivation::ID_KMAC256,
    key_derivation::ID_HMAC_WITH_SHA1,
    key_derivation::ID_HMAC_WITH_SHA224,
    key_derivation::ID_HMAC_WITH_SHA256,
    key_derivation::ID_HMAC_WITH_SHA384,
    key_derivation::ID_HMAC_WITH_SHA512,
    key_derivation::ID_HMAC_WITH_SHA512_224,
    key_derivation::ID_HMAC_WITH_SHA512_256,
    key_derivation::ID_RSASSA_PKCS1_V1_5_WITH_SHA3_224,
    key_derivation::ID_RSASSA_PKCS1_V1_5_WITH_SHA3_256,
    key_derivation::ID_RSASSA_PKCS1_V1_5_WITH_SHA3_384,
    key_derivation::ID_RSASSA_PKCS1_V1_5_WITH_SHA3_512,
];

const KEY_DERIVATION: Registrations = &[
    (ALGORITHM_IDENTIFIERS, KEY_DERIVATION_ALGORITHMS),
    (SMIME_CAPABILITIES, KEY_DERIVATION_ALGORITHMS),
];

const KEM_RSA_ALGORITHMS: &[Oid] =
    &[kem_rsa::ID_RSA_KEM, kem_rsa::ID_KEM_RSA, kem_rsa::ID_ALG_CMS3DES_WRAP];

const KEM_RSA: Registrations = &[
    (ALGORITHM_IDENTIFIERS, KEM_RSA_ALGORITHMS),
    (SMIME_CAPABILITIES, KEM_RSA_ALGORITHMS),
];

const CMP_ALGORITHMS_ENTRIES: &[Oid] = &[
    cmp_algorithms::ID_ALG_ESDH,
    cmp_algorithms::DH_SINGLE_PASS_STD_DH_SHA224KDF_SCHEME,
    cmp_algorithms::DH_SINGLE_PASS_STD_DH_SHA256KDF_SCHEME,
    cmp_algorithms::DH_SINGLE_PASS_STD_DH_SHA384KDF_SCHEME,
    cmp_algorithms::DH_SINGLE_PASS_STD_DH_SHA512KDF_SCHEME,
    cmp_algorithms::DH_SINGLE_PASS_COFACTOR_DH_SHA224KDF_SCHEME,
    cmp_algorithms::DH_SINGLE_PASS_COFACTOR_DH_SHA256KDF_SCHEME,
    cmp_algorithms::DH_SINGLE_PASS_COFACTOR_DH_SHA384KDF_SCHEME,
    cmp_algorithms::DH_SINGLE_PASS_COFACTOR_DH_SHA512KDF_SCHEME,
    cmp_algorithms::MQV_SINGLE_PASS_SHA224KDF_SCHEME,
    cmp_algorithms::MQV_SINGLE_PASS_SHA256KDF_SCHEME,
    cmp_algorithms::MQV_SINGLE_PASS_SHA384KDF_SCHEME,
    cmp_algorithms::MQV_SINGLE_PASS_SHA512KDF_SCHEME,
    cmp_algorithms::ID_AES128_CBC,
    cmp_algorithms::ID_AES192_CBC,
    cmp_algorithms::ID_AES256_CBC,
    cmp_algorithms::ID_AES128_GMAC,
    cmp_algorithms::ID_AES192_GMAC,
    cmp_algorithms::ID_AES256_GMAC,
];

const CMP_ALGORITHMS: Registrations = &[
    (ALGORITHM_IDENTIFIERS, CMP_ALGORITHMS_ENTRIES),
    (SMIME_CAPABILITIES, CMP_ALGORITHMS_ENTRIES),
];

const OCSP: Registrations = &[
    (OCSP_RESPONSE_TYPES, &[ocsp::ID_PKIX_OCSP_BASIC]),
    (CERTIFICATE_EXTENSIONS, &[
        ocsp::ID_PKIX_OCSP_NONCE,
        ocsp::ID_PKIX_OCSP_CRL,
        ocsp::ID_PKIX_OCSP_RESPONSE,
        ocsp::ID_PKIX_OCSP_NOCHECK,
        ocsp::ID_PKIX_OCSP_ARCHIVE_CUTOFF,
        ocsp::ID_PKIX_OCSP_SERVICE_LOCATOR,
        ocsp::ID_PKIX_OCSP_PREF_SIG_ALGS,
        ocsp::ID_PKIX_OCSP_EXTENDED_REVOKE,
    ]),
];

const REGISTRATIONS: &[(&str, Registrations)] = &[
    ("pkix", PKIX),
    ("cms", CMS),
    ("pkcs10", PKCS10),
    ("crmf", CRMF),
    ("cmp", CMP),
    ("cmp_algorithms", CMP_ALGORITHMS),
    ("cert_extensions", CERT_EXTENSIONS),
    ("related_certs", RELATED_CERTS),
    ("other_names", OTHER_NAMES_MODULE),
    ("csr_templates", CSR_TEMPLATES),
    ("rpki", RPKI),
    ("kem_recipient", KEM_RECIPIENT),
    ("private_keys", PRIVATE_KEYS),
    ("key_derivation", KEY_DERIVATION),
    ("kem_rsa", KEM_RSA),
    ("ocsp", OCSP),
    ("attribute_certificate", &[]),
    ("key_purposes", &[]),
    ("post_quantum", &[]),
    ("snmp", &[]),
];

const REGISTRIES: [&str; 10] = [
    CERTIFICATE_EXTENSIONS,
    CERTIFICATE_ATTRIBUTES,
    CMS_ATTRIBUTES,
    CMS_CONTENT_TYPES,
    CMP_INFO_TYPES,
    ALGORITHM_IDENTIFIERS,
    OTHER_NAMES,
    SMIME_CAPABILITIES,
    OCSP_RESPONSE_TYPES,
    OTHER_RECIPIENT_INFO,
];

fn entries(catalog: &SchemaCatalog) -> BTreeMap<&'static str, BTreeSet<Oid>> {
    REGISTRIES
        .iter()
        .map(|name| (*name, catalog.registry(name).oids().into_iter().collect()))
        .collect()
}

#[test]
fn test_module_registrations() -> Result<()> {
    for module in modules::ALL {
        ensure!(
            REGISTRATIONS.iter().any(|(name, _)| *name == module.name),
            "no registrations listed for {}",
            module.name
        );
    }
    for (name, registrations) in REGISTRATIONS {
        let module = modules::find(name).ok_or_else(|| err!("unknown module {name}"))?;
        let catalog = SchemaCatalog::new();
        modules::load(&catalog, module.depends_on)?;
        let before = entries(&catalog);
        modules::load(&catalog, &[*name])?;
        let after = entries(&catalog);

        for registry in REGISTRIES {
            let added: BTreeSet<Oid> = after[registry].difference(&before[registry]).copied().collect();
            let expected: BTreeSet<Oid> = registrations
                .iter()
                .filter(|(r, _)| *r == registry)
                .flat_map(|(_, oids)| oids.iter().copied())
                .collect();
            assert_eq!(added, expected, "{name} registrations in {registry}");
        }
    }
    Ok(())
}

#[test]
fn test_load_all_registrations() -> Result<()> {
    let catalog = dataset::catalog()?;
    let loaded = entries(&catalog);
    for (name, registrations) in REGISTRATIONS {
        for (registry, oids) in *registrations {
            for oid in *oids {
                ensure!(loaded[registry].contains(oid), "{registry} is missing {oid} of {name}");
            }
        }
    }

    let names = catalog.registry_names();
    for registry in REGISTRIES {
        ensure!(names.iter().any(|n| n == registry), "registry {registry} was not created");
    }
    for module in modules::ALL {
        ensure!(catalog.is_loaded(module.name), "{} not loaded", module.name);
    }
    Ok(())
}

#[test]
fn test_load_is_idempotent() -> Result<()> {
    let catalog = dataset::catalog()?;
    let types = catalog.type_names();
    let extensions = catalog.registry(CERTIFICATE_EXTENSIONS).oids();

    modules::load_all(&catalog)?;
    modules::load(&catalog, &["cmp", "rpki"])?;
    assert_eq!(catalog.type_names(), types);
    assert_eq!(catalog.registry(CERTIFICATE_EXTENSIONS).oids(), extensions);

    // Defining an equal schema under a taken name hands back the original.
    let key_usage = catalog.schema("pkix.KeyUsage")?;
    let again = catalog.define("pkix.KeyUsage", key_usage.clone())?;
    assert!(std::sync::Arc::ptr_eq(&key_usage, &again));
    ensure!(
        catalog.define("pkix.KeyUsage", SchemaNode::integer()).is_err(),
        "redefining a type with another schema should fail"
    );
    Ok(())
}

#[test]
fn test_strict_catalog_has_no_conflicts() -> Result<()> {
    let catalog = SchemaCatalog::with_config(CatalogConfig {
        registry_conflict: Leniency::Strict,
        ..CatalogConfig::default()
    });
    modules::load_all(&catalog)?;

    let extensions = catalog.registry(CERTIFICATE_EXTENSIONS);
    let before = extensions.len();
    let key_usage = extensions
        .lookup(&pkix::ID_CE_KEY_USAGE)
        .ok_or_else(|| err!("keyUsage not registered"))?;
    let fresh = pkix::ID_PE.child(99)?;

    let result = extensions.merge_all([
        (fresh, SchemaNode::null()),
        (pkix::ID_CE_KEY_USAGE, SchemaNode::octet_string()),
    ]);
    match result {
        Err(Error::RegistryConflict { registry, oid }) => {
            assert_eq!(registry, CERTIFICATE_EXTENSIONS);
            assert_eq!(oid, pkix::ID_CE_KEY_USAGE);
        }
        other => anyhow::bail!("expected a registry conflict, got {other:?}"),
    }
    // The batch was rejected as a whole.
    assert_eq!(extensions.len(), before);
    assert!(!extensions.contains(&fresh));
    assert_eq!(extensions.lookup(&pkix::ID_CE_KEY_USAGE), Some(key_usage.clone()));

    // Registering the same schema again is not a conflict.
    extensions.register(pkix::ID_CE_KEY_USAGE, key_usage)?;
    Ok(())
}

#[test]
fn test_strict_conflict_within_one_batch() -> Result<()> {
    let catalog = SchemaCatalog::with_config(CatalogConfig {
        registry_conflict: Leniency::Strict,
        ..CatalogConfig::default()
    });
    modules::load(&catalog, &["pkix"])?;
    let extensions = catalog.registry(CERTIFICATE_EXTENSIONS);
    let before = extensions.oids();
    let fresh = pkix::ID_PE.child(98)?;

    let result = extensions.merge_all([
        (fresh, SchemaNode::integer()),
        (pkix::ID_PE.child(97)?, SchemaNode::null()),
        (fresh, SchemaNode::octet_string()),
    ]);
    match result {
        Err(Error::RegistryConflict { oid, .. }) => assert_eq!(oid, fresh),
        other => anyhow::bail!("expected a registry conflict, got {other:?}"),
    }
    assert_eq!(extensions.oids(), before);

    // Repeating an OID with an equal schema is fine.
    extensions.merge_all([(fresh, SchemaNode::null()), (fresh, SchemaNode::null())])?;
    assert_eq!(extensions.lookup(&fresh), Some(SchemaNode::null()));
    Ok(())
}

#[test]
fn test_default_conflict_policy_replaces() -> Result<()> {
    let catalog = dataset::catalog()?;
    let extensions = catalog.registry(CERTIFICATE_EXTENSIONS);
    extensions.register(cert_extensions::ID_PE_DELEGATION_USAGE, SchemaNode::octet_string())?;
    assert_eq!(
        extensions.lookup(&cert_extensions::ID_PE_DELEGATION_USAGE),
        Some(SchemaNode::octet_string())
    );
    Ok(())
}

#[test]
fn test_unknown_oids_stay_raw() -> Result<()> {
    let catalog = dataset::catalog()?;

    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let der = hex!("300b 0603 2a0304 0404 01020304");
    let value = catalog.decode_exact(&der, &algorithm_identifier)?;
    let parameters = value
        .get("parameters")
        .ok_or_else(|| err!("parameters missing"))?;
    ensure!(matches!(parameters, Value::Open(OpenValue::Raw(_))), "parameters were resolved");
    assert_eq!(catalog.encode(&value, &algorithm_identifier)?, der);

    let extension = catalog.schema("pkix.Extension")?;
    let der = hex!("300e 0603 2a0304 0407 0c0568656c6c6f");
    let value = catalog.decode_exact(&der, &extension)?;
    assert_eq!(
        value.get("extnValue").and_then(Value::as_bytes),
        Some(&hex!("0c0568656c6c6f")[..])
    );
    assert_eq!(catalog.encode(&value, &extension)?, der);
    Ok(())
}

#[test]
fn test_resolution_can_be_disabled() -> Result<()> {
    let catalog = SchemaCatalog::with_config(CatalogConfig {
        resolve_open_types: false,
        ..CatalogConfig::default()
    });
    modules::load(&catalog, &["pkix"])?;
    let extension = catalog.schema("pkix.Extension")?;
    let der = hex!("300f 0603 551d13 0101ff 0405 3003 0101ff");
    let value = catalog.decode_exact(&der, &extension)?;
    assert_eq!(
        value.get("extnValue").and_then(Value::as_bytes),
        Some(&hex!("3003 0101ff")[..])
    );
    assert!(value.get("extnValue.cA").is_none());
    assert_eq!(catalog.encode(&value, &extension)?, der);
    Ok(())
}

#[test]
fn test_concurrent_registration_and_decoding() -> Result<()> {
    let catalog = dataset::catalog()?;
    let extension = catalog.schema("pkix.Extension")?;
    let der = hex!("300f 0603 551d13 0101ff 0405 3003 0101ff");
    let before = catalog.registry(CERTIFICATE_EXTENSIONS).len();

    thread::scope(|scope| -> Result<()> {
        let workers: Vec<_> = (0..8u32)
            .map(|i| {
                let catalog = &catalog;
                let extension = &extension;
                scope.spawn(move || -> Result<()> {
                    let oid = Oid::new_unwrap("1.3.6.1.4.1.99999").child(i)?;
                    catalog
                        .registry(CERTIFICATE_EXTENSIONS)
                        .register(oid, SchemaNode::null())?;
                    for _ in 0..50 {
                        let value = catalog.decode_exact(&der, extension)?;
                        ensure!(value.get("extnValue.cA") == Some(&Value::Boolean(true)));
                    }
                    Ok(())
                })
            })
            .collect();
        for worker in workers {
            worker.join().map_err(|_| err!("worker panicked"))??;
        }
        Ok(())
    })?;

    assert_eq!(catalog.registry(CERTIFICATE_EXTENSIONS).len(), before + 8);
    Ok(())
}

#[test]
fn test_global_catalog() -> Result<()> {
    let catalog = SchemaCatalog::global();
    modules::load(catalog, &["pkix"])?;
    assert!(catalog.is_loaded("pkix"));
    assert!(get_registry(CERTIFICATE_EXTENSIONS).contains(&pkix::ID_CE_BASIC_CONSTRAINTS));
    assert!(std::ptr::eq(catalog, SchemaCatalog::global()));
    Ok(())
}
