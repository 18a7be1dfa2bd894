//! Test fixtures and constants.

/// A real SSH key pair checked in under `tests/fixtures/keys/`.
pub struct KeyPair {
    pub name: &'static str,
    pub public: &'static str,
    pub private: &'static str,
    /// File name under `~/.ssh` when installed as a default key.
    pub default_name: &'static str,
}

/// Unencrypted ed25519 key.
pub const ALICE: KeyPair = KeyPair {
    name: "alice",
    public: include_str!("../fixtures/keys/alice_ed25519.pub"),
    private: include_str!("../fixtures/keys/alice_ed25519"),
    default_name: "id_ed25519",
};

/// Passphrase-protected ed25519 key.
pub const BOB: KeyPair = KeyPair {
    name: "bob",
    public: include_str!("../fixtures/keys/bob_ed25519_protected.pub"),
    private: include_str!("../fixtures/keys/bob_ed25519_protected"),
    default_name: "id_ed25519",
};

/// Passphrase for [`BOB`].
pub const BOB_PASSPHRASE: &str = "correct horse battery staple";

/// Unencrypted RSA-2048 key.
pub const CAROL: KeyPair = KeyPair {
    name: "carol",
    public: include_str!("../fixtures/keys/carol_rsa.pub"),
    private: include_str!("../fixtures/keys/carol_rsa"),
    default_name: "id_rsa",
};

/// ECDSA key, which ghost does not support.
pub const DAVE: KeyPair = KeyPair {
    name: "dave",
    public: include_str!("../fixtures/keys/dave_ecdsa.pub"),
    private: include_str!("../fixtures/keys/dave_ecdsa"),
    default_name: "id_ecdsa",
};

/// An invalid public key for negative tests.
pub const INVALID_PUBLIC_KEY: &str = "ssh-ed25519 not-base64!";

/// Sample .env file content.
pub const SAMPLE_ENV: &str = "\
# local development
DATABASE_URL=postgres://localhost/mydb
API_KEY=abc123
JWT_SECRET=\"super secret jwt token\"
";
