//! Extended key usage purposes beyond the base profile.
//!
//! Purposes only name identifiers for the `extKeyUsage` extension, so this
//! module contributes no schemas.

use {
    super::Module,
    crate::{catalog::SchemaCatalog, error::Result, oid::Oid},
};

pub const MODULE: Module = Module {
    name:       "key_purposes",
    depends_on: &["pkix"],
    load,
};

pub const ID_KP_CMC_CA: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.27");
pub const ID_KP_CMC_RA: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.28");
pub const ID_KP_SECURE_SHELL_CLIENT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.21");
pub const ID_KP_SECURE_SHELL_SERVER: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.22");
pub const ID_KP_CM_KGA: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.32");
pub const ID_KP_JWT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.37");
pub const ID_KP_HTTP_CONTENT_ENCRYPT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.38");
pub const ID_KP_OAUTH_ACCESS_TOKEN_SIGNING: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.39");
pub const ID_KP_IM_URI: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.40");
pub const ID_KP_CONFIG_SIGNING: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.41");
pub const ID_KP_TRUST_ANCHOR_CONFIG_SIGNING: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.42");
pub const ID_KP_UPDATE_PACKAGE_SIGNING: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.43");
pub const ID_KP_SAFETY_COMMUNICATION: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3.44");

/// Every purpose defined here, by arc under `id-kp`.
pub const ALL: &[(u32, Oid)] = &[
    (21, ID_KP_SECURE_SHELL_CLIENT),
    (22, ID_KP_SECURE_SHELL_SERVER),
    (27, ID_KP_CMC_CA),
    (28, ID_KP_CMC_RA),
    (32, ID_KP_CM_KGA),
    (37, ID_KP_JWT),
    (38, ID_KP_HTTP_CONTENT_ENCRYPT),
    (39, ID_KP_OAUTH_ACCESS_TOKEN_SIGNING),
    (40, ID_KP_IM_URI),
    (41, ID_KP_CONFIG_SIGNING),
    (42, ID_KP_TRUST_ANCHOR_CONFIG_SIGNING),
    (43, ID_KP_UPDATE_PACKAGE_SIGNING),
    (44, ID_KP_SAFETY_COMMUNICATION),
];

fn load(_: &SchemaCatalog) -> Result<()> {
    Ok(())
}
