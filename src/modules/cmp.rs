//! Certificate Management Protocol messages.
//!
//! Tags in this module are explicit unless stated otherwise. A nested
//! message body refers back to `cmp.PKIMessages`, so messages can contain
//! messages to any depth the catalog allows.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{ALGORITHM_IDENTIFIERS, CMP_INFO_TYPES, CMS_ATTRIBUTES},
        schema::{constraint::Constraint, Component, Schema, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "cmp",
    depends_on: &["pkix", "cms", "pkcs10", "crmf"],
    load,
};

/// General message info types, `id-it`.
pub const ID_IT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4");
pub const ID_IT_CA_PROT_ENC_CERT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.1");
pub const ID_IT_SIGN_KEY_PAIR_TYPES: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.2");
pub const ID_IT_ENC_KEY_PAIR_TYPES: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.3");
pub const ID_IT_PREFERRED_SYMM_ALG: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.4");
pub const ID_IT_CA_KEY_UPDATE_INFO: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.5");
pub const ID_IT_CURRENT_CRL: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.6");
pub const ID_IT_UNSUPPORTED_OIDS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.7");
pub const ID_IT_KEY_PAIR_PARAM_REQ: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.10");
pub const ID_IT_KEY_PAIR_PARAM_REP: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.11");
pub const ID_IT_REV_PASSPHRASE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.12");
pub const ID_IT_IMPLICIT_CONFIRM: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.13");
pub const ID_IT_CONFIRM_WAIT_TIME: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.14");
pub const ID_IT_ORIG_PKI_MESSAGE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.15");
pub const ID_IT_SUPP_LANG_TAGS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.16");
pub const ID_IT_CA_CERTS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.17");
pub const ID_IT_ROOT_CA_KEY_UPDATE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.18");
pub const ID_IT_CERT_REQ_TEMPLATE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.19");
pub const ID_IT_ROOT_CA_CERT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.20");
pub const ID_IT_CERT_PROFILE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.21");
pub const ID_IT_CRL_STATUS_LIST: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.22");
pub const ID_IT_CRLS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.4.23");

pub const ID_REG_CTRL_ALT_CERT_TEMPLATE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.7");
pub const ID_REG_CTRL_ALG_ID: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.11");
pub const ID_REG_CTRL_RSA_KEY_LEN: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.12");

pub const ID_PASSWORD_BASED_MAC: Oid = Oid::new_unwrap("1.2.840.113533.7.66.13");
pub const ID_DH_BASED_MAC: Oid = Oid::new_unwrap("1.2.840.113533.7.66.30");

/// `SEQUENCE SIZE (1..MAX) OF element`.
fn non_empty(element: &Schema) -> Schema {
    SchemaNode::sequence_of(element).constrained(Constraint::non_empty())
}

#[allow(clippy::too_many_lines)]
fn load(catalog: &SchemaCatalog) -> Result<()> {
    let oid = SchemaNode::object_identifier();
    let integer = SchemaNode::integer();
    let bit_string = SchemaNode::bit_string();
    let octet_string = SchemaNode::octet_string();
    let generalized_time = SchemaNode::generalized_time();
    let utf8 = SchemaNode::utf8_string();
    let null = SchemaNode::null();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let general_name = catalog.schema("pkix.GeneralName")?;
    let general_names = catalog.schema("pkix.GeneralNames")?;
    let certificate = catalog.schema("pkix.Certificate")?;
    let certificate_list = catalog.schema("pkix.CertificateList")?;
    let extensions = catalog.schema("pkix.Extensions")?;
    let time = catalog.schema("pkix.Time")?;
    let enveloped_data = catalog.schema("cms.EnvelopedData")?;
    let encrypted_key = catalog.schema("crmf.EncryptedKey")?;
    let cert_template = catalog.schema("crmf.CertTemplate")?;
    let cert_req_messages = catalog.schema("crmf.CertReqMessages")?;
    let cert_id = catalog.schema("crmf.CertId")?;
    let controls = catalog.schema("crmf.Controls")?;
    let publication_info = catalog.schema("crmf.PKIPublicationInfo")?;

    let cmp_certificate = catalog.define(
        "cmp.CMPCertificate",
        SchemaNode::choice([Component::required("x509v3PKCert", &certificate)])?,
    )?;
    let free_text = catalog.define("cmp.PKIFreeText", non_empty(&utf8))?;
    let status = catalog.define("cmp.PKIStatus", integer.clone())?;
    let status_info = catalog.define(
        "cmp.PKIStatusInfo",
        SchemaNode::sequence([
            Component::required("status", &status),
            Component::optional("statusString", &free_text),
            Component::optional("failInfo", &bit_string),
        ])?,
    )?;
    let info_type_and_value = catalog.define(
        "cmp.InfoTypeAndValue",
        SchemaNode::sequence([
            Component::required("infoType", &oid),
            Component::optional(
                "infoValue",
                &SchemaNode::any().bound_to("infoType", CMP_INFO_TYPES),
            ),
        ])?,
    )?;
    let general_info = non_empty(&info_type_and_value);
    let header = catalog.define(
        "cmp.PKIHeader",
        SchemaNode::sequence([
            Component::required("pvno", &integer),
            Component::required("sender", &general_name),
            Component::required("recipient", &general_name),
            Component::optional("messageTime", &generalized_time.explicit(0)?),
            Component::optional("protectionAlg", &algorithm_identifier.explicit(1)?),
            Component::optional("senderKID", &octet_string.explicit(2)?),
            Component::optional("recipKID", &octet_string.explicit(3)?),
            Component::optional("transactionID", &octet_string.explicit(4)?),
            Component::optional("senderNonce", &octet_string.explicit(5)?),
            Component::optional("recipNonce", &octet_string.explicit(6)?),
            Component::optional("freeText", &free_text.explicit(7)?),
            Component::optional("generalInfo", &general_info.explicit(8)?),
        ])?,
    )?;

    // Certificate responses.
    let cert_or_enc_cert = catalog.define(
        "cmp.CertOrEncCert",
        SchemaNode::choice([
            Component::required("certificate", &cmp_certificate.explicit(0)?),
            Component::required("encryptedCert", &encrypted_key.explicit(1)?),
        ])?,
    )?;
    let certified_key_pair = catalog.define(
        "cmp.CertifiedKeyPair",
        SchemaNode::sequence([
            Component::required("certOrEncCert", &cert_or_enc_cert),
            Component::optional("privateKey", &encrypted_key.explicit(0)?),
            Component::optional("publicationInfo", &publication_info.explicit(1)?),
        ])?,
    )?;
    let cert_response = catalog.define(
        "cmp.CertResponse",
        SchemaNode::sequence([
            Component::required("certReqId", &integer),
            Component::required("status", &status_info),
            Component::optional("certifiedKeyPair", &certified_key_pair),
            Component::optional("rspInfo", &octet_string),
        ])?,
    )?;
    let cert_rep_message = catalog.define(
        "cmp.CertRepMessage",
        SchemaNode::sequence([
            Component::optional("caPubs", &non_empty(&cmp_certificate).explicit(1)?),
            Component::required("response", &SchemaNode::sequence_of(&cert_response)),
        ])?,
    )?;

    // Proof of possession challenges.
    let challenge = catalog.define(
        "cmp.Challenge",
        SchemaNode::sequence([
            Component::optional("owf", &algorithm_identifier),
            Component::required("witness", &octet_string),
            Component::required("challenge", &octet_string),
            Component::optional("encryptedRand", &enveloped_data.explicit(0)?),
        ])?,
    )?;
    catalog.define(
        "cmp.Rand",
        SchemaNode::sequence([
            Component::required("int", &integer),
            Component::required("sender", &general_name),
        ])?,
    )?;

    // Key recovery and revocation.
    let key_rec_rep_content = catalog.define(
        "cmp.KeyRecRepContent",
        SchemaNode::sequence([
            Component::required("status", &status_info),
            Component::optional("newSigCert", &cmp_certificate.explicit(0)?),
            Component::optional("caCerts", &non_empty(&cmp_certificate).explicit(1)?),
            Component::optional("keyPairHist", &non_empty(&certified_key_pair).explicit(2)?),
        ])?,
    )?;
    let rev_details = catalog.define(
        "cmp.RevDetails",
        SchemaNode::sequence([
            Component::required("certDetails", &cert_template),
            Component::optional("crlEntryDetails", &extensions),
        ])?,
    )?;
    let rev_rep_content = catalog.define(
        "cmp.RevRepContent",
        SchemaNode::sequence([
            Component::required("status", &non_empty(&status_info)),
            Component::optional("revCerts", &non_empty(&cert_id).explicit(0)?),
            Component::optional("crls", &non_empty(&certificate_list).explicit(1)?),
        ])?,
    )?;
    let ca_key_upd_ann_content = catalog.define(
        "cmp.CAKeyUpdAnnContent",
        SchemaNode::sequence([
            Component::required("oldWithNew", &cmp_certificate),
            Component::required("newWithOld", &cmp_certificate),
            Component::required("newWithNew", &cmp_certificate),
        ])?,
    )?;
    let rev_ann_content = catalog.define(
        "cmp.RevAnnContent",
        SchemaNode::sequence([
            Component::required("status", &status),
            Component::required("certId", &cert_id),
            Component::required("willBeRevokedAt", &generalized_time),
            Component::required("badSinceDate", &generalized_time),
            Component::optional("crlDetails", &extensions),
        ])?,
    )?;
    let error_msg_content = catalog.define(
        "cmp.ErrorMsgContent",
        SchemaNode::sequence([
            Component::required("pKIStatusInfo", &status_info),
            Component::optional("errorCode", &integer),
            Component::optional("errorDetails", &free_text),
        ])?,
    )?;
    let cert_status = catalog.define(
        "cmp.CertStatus",
        SchemaNode::sequence([
            Component::optional("hashAlg", &algorithm_identifier.explicit(0)?),
            Component::required("certHash", &octet_string),
            Component::required("certReqId", &integer),
            Component::optional("statusInfo", &status_info),
        ])?,
    )?;
    let poll_req = SchemaNode::sequence([Component::required("certReqId", &integer)])?;
    let poll_rep = SchemaNode::sequence([
        Component::required("certReqId", &integer),
        Component::required("checkAfter", &integer),
        Component::optional("reason", &free_text),
    ])?;
    let gen_msg_content = catalog.define(
        "cmp.GenMsgContent",
        SchemaNode::sequence_of(&info_type_and_value),
    )?;

    let body = catalog.define(
        "cmp.PKIBody",
        SchemaNode::choice([
            Component::required("ir", &cert_req_messages.explicit(0)?),
            Component::required("ip", &cert_rep_message.explicit(1)?),
            Component::required("cr", &cert_req_messages.explicit(2)?),
            Component::required("cp", &cert_rep_message.explicit(3)?),
            Component::required(
                "p10cr",
                &catalog.schema("pkcs10.CertificationRequest")?.explicit(4)?,
            ),
            Component::required("popdecc", &SchemaNode::sequence_of(&challenge).explicit(5)?),
            Component::required("popdecr", &SchemaNode::sequence_of(&integer).explicit(6)?),
            Component::required("kur", &cert_req_messages.explicit(7)?),
            Component::required("kup", &cert_rep_message.explicit(8)?),
            Component::required("krr", &cert_req_messages.explicit(9)?),
            Component::required("krp", &key_rec_rep_content.explicit(10)?),
            Component::required("rr", &SchemaNode::sequence_of(&rev_details).explicit(11)?),
            Component::required("rp", &rev_rep_content.explicit(12)?),
            Component::required("ccr", &cert_req_messages.explicit(13)?),
            Component::required("ccp", &cert_rep_message.explicit(14)?),
            Component::required("ckuann", &ca_key_upd_ann_content.explicit(15)?),
            Component::required("cann", &cmp_certificate.explicit(16)?),
            Component::required("rann", &rev_ann_content.explicit(17)?),
            Component::required(
                "crlann",
                &SchemaNode::sequence_of(&certificate_list).explicit(18)?,
            ),
            Component::required("pkiconf", &null.explicit(19)?),
            Component::required("nested", &SchemaNode::deferred("cmp.PKIMessages").explicit(20)?),
            Component::required("genm", &gen_msg_content.explicit(21)?),
            Component::required("genp", &gen_msg_content.explicit(22)?),
            Component::required("error", &error_msg_content.explicit(23)?),
            Component::required("certConf", &SchemaNode::sequence_of(&cert_status).explicit(24)?),
            Component::required("pollReq", &SchemaNode::sequence_of(&poll_req).explicit(25)?),
            Component::required("pollRep", &SchemaNode::sequence_of(&poll_rep).explicit(26)?),
        ])?,
    )?;
    let message = catalog.define(
        "cmp.PKIMessage",
        SchemaNode::sequence([
            Component::required("header", &header),
            Component::required("body", &body),
            Component::optional("protection", &bit_string.explicit(0)?),
            Component::optional("extraCerts", &non_empty(&cmp_certificate).explicit(1)?),
        ])?,
    )?;
    let messages = catalog.define("cmp.PKIMessages", non_empty(&message))?;

    // General message content.
    let root_ca_key_update = catalog.define(
        "cmp.RootCaKeyUpdateContent",
        SchemaNode::sequence([
            Component::required("newWithNew", &cmp_certificate),
            Component::optional("newWithOld", &cmp_certificate.explicit(0)?),
            Component::optional("oldWithNew", &cmp_certificate.explicit(1)?),
        ])?,
    )?;
    let cert_req_template = catalog.define(
        "cmp.CertReqTemplateContent",
        SchemaNode::sequence([
            Component::required("certTemplate", &cert_template),
            Component::optional("keySpec", &controls),
        ])?,
    )?;
    let crl_source = SchemaNode::choice([
        Component::required(
            "dpn",
            &catalog.schema("pkix.DistributionPointName")?.explicit(0)?,
        ),
        Component::required("issuer", &general_names.explicit(1)?),
    ])?;
    let crl_status = catalog.define(
        "cmp.CRLStatus",
        SchemaNode::sequence([
            Component::required("source", &crl_source),
            Component::optional("thisUpdate", &time),
        ])?,
    )?;
    let algorithm_identifiers = SchemaNode::sequence_of(&algorithm_identifier);

    catalog.registry(CMP_INFO_TYPES).merge_all([
        (ID_IT_CA_PROT_ENC_CERT, cmp_certificate.clone()),
        (ID_IT_SIGN_KEY_PAIR_TYPES, algorithm_identifiers.clone()),
        (ID_IT_ENC_KEY_PAIR_TYPES, algorithm_identifiers),
        (ID_IT_PREFERRED_SYMM_ALG, algorithm_identifier.clone()),
        (ID_IT_CA_KEY_UPDATE_INFO, ca_key_upd_ann_content),
        (ID_IT_CURRENT_CRL, certificate_list.clone()),
        (ID_IT_UNSUPPORTED_OIDS, SchemaNode::sequence_of(&oid)),
        (ID_IT_KEY_PAIR_PARAM_REQ, oid),
        (ID_IT_KEY_PAIR_PARAM_REP, algorithm_identifier.clone()),
        (ID_IT_REV_PASSPHRASE, encrypted_key),
        (ID_IT_IMPLICIT_CONFIRM, null),
        (ID_IT_CONFIRM_WAIT_TIME, generalized_time),
        (ID_IT_ORIG_PKI_MESSAGE, messages),
        (ID_IT_SUPP_LANG_TAGS, SchemaNode::sequence_of(&utf8)),
        (ID_IT_CA_CERTS, non_empty(&cmp_certificate)),
        (ID_IT_ROOT_CA_KEY_UPDATE, root_ca_key_update),
        (ID_IT_CERT_REQ_TEMPLATE, cert_req_template),
        (ID_IT_ROOT_CA_CERT, cmp_certificate),
        (ID_IT_CERT_PROFILE, non_empty(&utf8)),
        (ID_IT_CRL_STATUS_LIST, non_empty(&crl_status)),
        (ID_IT_CRLS, non_empty(&certificate_list)),
    ])?;

    catalog.registry(CMS_ATTRIBUTES).merge_all([
        (
            ID_REG_CTRL_ALT_CERT_TEMPLATE,
            catalog.schema("crmf.AttributeTypeAndValue")?,
        ),
        (ID_REG_CTRL_ALG_ID, algorithm_identifier.clone()),
        (
            ID_REG_CTRL_RSA_KEY_LEN,
            integer.constrained(Constraint::value(1..)?),
        ),
    ])?;

    let pbm_parameter = catalog.define(
        "cmp.PBMParameter",
        SchemaNode::sequence([
            Component::required("salt", &octet_string),
            Component::required("owf", &algorithm_identifier),
            Component::required("iterationCount", &integer),
            Component::required("mac", &algorithm_identifier),
        ])?,
    )?;
    let dhbm_parameter = catalog.define(
        "cmp.DHBMParameter",
        SchemaNode::sequence([
            Component::required("owf", &algorithm_identifier),
            Component::required("mac", &algorithm_identifier),
        ])?,
    )?;
    catalog.registry(ALGORITHM_IDENTIFIERS).merge_all([
        (ID_PASSWORD_BASED_MAC, pbm_parameter),
        (ID_DH_BASED_MAC, dhbm_parameter),
    ])?;
    Ok(())
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{oid::OidExt, schema::value::Value},
        hex_literal::hex,
    };

    fn catalog() -> SchemaCatalog {
        let catalog = SchemaCatalog::new();
        crate::modules::load(&catalog, &["cmp"]).unwrap();
        catalog
    }

    #[test]
    fn test_info_type_arcs() {
        let registry = catalog().registry(CMP_INFO_TYPES);
        assert_eq!(registry.len(), 21);
        for arc in (1..=7).chain(10..=23) {
            assert!(registry.contains(&ID_IT.child(arc).unwrap()), "id-it {arc}");
        }
        assert!(!registry.contains(&ID_IT.child(8).unwrap()));
    }

    #[test]
    fn test_pkiconf_body() {
        let catalog = catalog();
        let body = catalog.schema("cmp.PKIBody").unwrap();
        let der = hex!("b302 0500");
        let value = catalog.decode_exact(&der, &body).unwrap();
        assert_eq!(value.get("pkiconf"), Some(&Value::Null));
        assert_eq!(catalog.encode(&value, &body).unwrap(), der);
    }

    #[test]
    fn test_implicit_confirm_info() {
        let catalog = catalog();
        let info = catalog.schema("cmp.InfoTypeAndValue").unwrap();
        let der = hex!("300c 0608 2b0601050507040d 0500");
        let value = catalog.decode_exact(&der, &info).unwrap();
        let field = value.as_fields().and_then(|f| f.get("infoValue")).unwrap();
        assert!(field.is_resolved());
        assert_eq!(value.get("infoValue"), Some(&Value::Null));
        assert_eq!(catalog.encode(&value, &info).unwrap(), der);
    }

    #[test]
    fn test_poll_rep() {
        let catalog = catalog();
        let body = catalog.schema("cmp.PKIBody").unwrap();
        // pollRep [26] { certReqId 0, checkAfter 10 }
        let der = hex!("ba0a 3008 3006 020100 02010a");
        let value = catalog.decode_exact(&der, &body).unwrap();
        assert_eq!(value.get("pollRep[0].checkAfter").and_then(Value::as_i64), Some(10));
        assert!(value.get("pollRep[0].reason").is_none());
    }
}
