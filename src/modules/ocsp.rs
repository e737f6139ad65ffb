//! Online Certificate Status Protocol.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{CERTIFICATE_EXTENSIONS, OCSP_RESPONSE_TYPES},
        schema::{constraint::Constraint, value::Value, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "ocsp",
    depends_on: &["pkix"],
    load,
};

pub const ID_PKIX_OCSP: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1");
pub const ID_PKIX_OCSP_BASIC: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.1");
pub const ID_PKIX_OCSP_NONCE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.2");
pub const ID_PKIX_OCSP_CRL: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.3");
pub const ID_PKIX_OCSP_RESPONSE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.4");
pub const ID_PKIX_OCSP_NOCHECK: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.5");
pub const ID_PKIX_OCSP_ARCHIVE_CUTOFF: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.6");
pub const ID_PKIX_OCSP_SERVICE_LOCATOR: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.7");
pub const ID_PKIX_OCSP_PREF_SIG_ALGS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.8");
pub const ID_PKIX_OCSP_EXTENDED_REVOKE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48.1.9");

const UB_NONCE: u64 = 128;

#[allow(clippy::too_many_lines)]
fn load(catalog: &SchemaCatalog) -> Result<()> {
    let oid = SchemaNode::object_identifier();
    let integer = SchemaNode::integer();
    let octet_string = SchemaNode::octet_string();
    let bit_string = SchemaNode::bit_string();
    let generalized_time = SchemaNode::generalized_time();
    let null = SchemaNode::null();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let extensions = catalog.schema("pkix.Extensions")?;
    let name = catalog.schema("pkix.Name")?;
    let version = catalog.schema("pkix.Version")?;
    let certs = SchemaNode::sequence_of(&catalog.schema("pkix.Certificate")?).explicit(0)?;
    let v1 = Value::integer(0)?;

    let cert_id = catalog.define(
        "ocsp.CertID",
        SchemaNode::sequence([
            Component::required("hashAlgorithm", &algorithm_identifier),
            Component::required("issuerNameHash", &octet_string),
            Component::required("issuerKeyHash", &octet_string),
            Component::required("serialNumber", &integer),
        ])?,
    )?;

    // Requests.
    let request = catalog.define(
        "ocsp.Request",
        SchemaNode::sequence([
            Component::required("reqCert", &cert_id),
            Component::optional("singleRequestExtensions", &extensions.explicit(0)?),
        ])?,
    )?;
    let tbs_request = catalog.define(
        "ocsp.TBSRequest",
        SchemaNode::sequence([
            Component::defaulted("version", &version.explicit(0)?, v1.clone()),
            Component::optional(
                "requestorName",
                &catalog.schema("pkix.GeneralName")?.explicit(1)?,
            ),
            Component::required("requestList", &SchemaNode::sequence_of(&request)),
            Component::optional("requestExtensions", &extensions.explicit(2)?),
        ])?,
    )?;
    let signature = catalog.define(
        "ocsp.Signature",
        SchemaNode::sequence([
            Component::required("signatureAlgorithm", &algorithm_identifier),
            Component::required("signature", &bit_string),
            Component::optional("certs", &certs),
        ])?,
    )?;
    catalog.define(
        "ocsp.OCSPRequest",
        SchemaNode::sequence([
            Component::required("tbsRequest", &tbs_request),
            Component::optional("optionalSignature", &signature.explicit(0)?),
        ])?,
    )?;

    // Responses.
    let response_bytes = catalog.define(
        "ocsp.ResponseBytes",
        SchemaNode::sequence([
            Component::required("responseType", &oid),
            Component::required(
                "response",
                &octet_string.bound_to("responseType", OCSP_RESPONSE_TYPES),
            ),
        ])?,
    )?;
    catalog.define(
        "ocsp.OCSPResponse",
        SchemaNode::sequence([
            Component::required(
                "responseStatus",
                &SchemaNode::enumerated().constrained(Constraint::union([
                    Constraint::value(0..=3)?,
                    Constraint::value(5..=6)?,
                ])),
            ),
            Component::optional("responseBytes", &response_bytes.explicit(0)?),
        ])?,
    )?;
    let responder_id = catalog.define(
        "ocsp.ResponderID",
        SchemaNode::choice([
            Component::required("byName", &name.explicit(1)?),
            Component::required("byKey", &octet_string.explicit(2)?),
        ])?,
    )?;
    let revoked_info = catalog.define(
        "ocsp.RevokedInfo",
        SchemaNode::sequence([
            Component::required("revocationTime", &generalized_time),
            Component::optional(
                "revocationReason",
                &catalog.schema("pkix.CRLReason")?.explicit(0)?,
            ),
        ])?,
    )?;
    let cert_status = catalog.define(
        "ocsp.CertStatus",
        SchemaNode::choice([
            Component::required("good", &null.implicit(0)?),
            Component::required("revoked", &revoked_info.implicit(1)?),
            Component::required("unknown", &null.implicit(2)?),
        ])?,
    )?;
    let single_response = catalog.define(
        "ocsp.SingleResponse",
        SchemaNode::sequence([
            Component::required("certID", &cert_id),
            Component::required("certStatus", &cert_status),
            Component::required("thisUpdate", &generalized_time),
            Component::optional("nextUpdate", &generalized_time.explicit(0)?),
            Component::optional("singleExtensions", &extensions.explicit(1)?),
        ])?,
    )?;
    let response_data = catalog.define(
        "ocsp.ResponseData",
        SchemaNode::sequence([
            Component::defaulted("version", &version.explicit(0)?, v1),
            Component::required("responderID", &responder_id),
            Component::required("producedAt", &generalized_time),
            Component::required("responses", &SchemaNode::sequence_of(&single_response)),
            Component::optional("responseExtensions", &extensions.explicit(1)?),
        ])?,
    )?;
    let basic_response = catalog.define(
        "ocsp.BasicOCSPResponse",
        SchemaNode::sequence([
            Component::required("tbsResponseData", &response_data),
            Component::required("signatureAlgorithm", &algorithm_identifier),
            Component::required("signature", &bit_string),
            Component::optional("certs", &certs),
        ])?,
    )?;

    // Extensions.
    let nonce = catalog.define(
        "ocsp.Nonce",
        octet_string.constrained(Constraint::size(1..=UB_NONCE)?),
    )?;
    let crl_id = catalog.define(
        "ocsp.CrlID",
        SchemaNode::sequence([
            Component::optional("crlUrl", &SchemaNode::ia5_string().explicit(0)?),
            Component::optional("crlNum", &integer.explicit(1)?),
            Component::optional("crlTime", &generalized_time.explicit(2)?),
        ])?,
    )?;
    let service_locator = catalog.define(
        "ocsp.ServiceLocator",
        SchemaNode::sequence([
            Component::required("issuer", &name),
            Component::required(
                "locator",
                &catalog.schema("pkix.AuthorityInfoAccessSyntax")?,
            ),
        ])?,
    )?;
    let preferred_signature_algorithm = SchemaNode::sequence([
        Component::required("sigIdentifier", &algorithm_identifier),
        Component::optional("certIdentifier", &algorithm_identifier),
    ])?;
    let preferred_signature_algorithms = catalog.define(
        "ocsp.PreferredSignatureAlgorithms",
        SchemaNode::sequence_of(&preferred_signature_algorithm),
    )?;

    catalog
        .registry(OCSP_RESPONSE_TYPES)
        .register(ID_PKIX_OCSP_BASIC, basic_response)?;
    catalog.registry(CERTIFICATE_EXTENSIONS).merge_all([
        (ID_PKIX_OCSP_NONCE, nonce),
        (ID_PKIX_OCSP_CRL, crl_id),
        (ID_PKIX_OCSP_RESPONSE, SchemaNode::sequence_of(&oid)),
        (ID_PKIX_OCSP_NOCHECK, null.clone()),
        (ID_PKIX_OCSP_ARCHIVE_CUTOFF, generalized_time),
        (ID_PKIX_OCSP_SERVICE_LOCATOR, service_locator),
        (ID_PKIX_OCSP_PREF_SIG_ALGS, preferred_signature_algorithms),
        (ID_PKIX_OCSP_EXTENDED_REVOKE, null),
    ])?;
    Ok(())
}
