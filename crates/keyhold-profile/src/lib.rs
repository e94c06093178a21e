// ABOUTME: Identity profile core for keyhold - wire keys, fingerprints, armor
// ABOUTME: Pure derivations over an immutable Profile value

pub mod armor;
pub mod error;
pub mod fingerprint;
pub mod pgp;
pub mod profile;
pub mod wire;

pub use armor::{armor, dearmor, ArmorHeaders};
pub use error::{ProfileError, Result};
pub use fingerprint::{ssh_fingerprint, ssh_fingerprint_hex};
pub use pgp::{pgp_fingerprint, PacketTag};
pub use profile::Profile;
pub use wire::{PublicKey, RsaPublicKey};
