//! Benchmark suites: which algorithms and operations each binary flavor
//! exposes, and where its results live on disk.

use std::fmt;

/// KEM algorithms measured by default, spelled the way liboqs spells them.
pub const KEM_ALGORITHMS: [&str; 15] = [
    "ML-KEM-512",
    "ML-KEM-768",
    "ML-KEM-1024",
    "HQC-128",
    "HQC-192",
    "HQC-256",
    "BIKE-L1",
    "BIKE-L3",
    "BIKE-L5",
    "FrodoKEM-640-AES",
    "FrodoKEM-640-SHAKE",
    "FrodoKEM-976-AES",
    "FrodoKEM-976-SHAKE",
    "FrodoKEM-1344-AES",
    "FrodoKEM-1344-SHAKE",
];

/// Signature algorithms measured by default.
pub const SIG_ALGORITHMS: [&str; 19] = [
    "ML-DSA-44",
    "ML-DSA-65",
    "ML-DSA-87",
    "Falcon-512",
    "Falcon-1024",
    "Falcon-padded-512",
    "Falcon-padded-1024",
    "SPHINCS+-SHA2-128f-simple",
    "SPHINCS+-SHA2-128s-simple",
    "SPHINCS+-SHA2-192f-simple",
    "SPHINCS+-SHA2-192s-simple",
    "SPHINCS+-SHA2-256f-simple",
    "SPHINCS+-SHA2-256s-simple",
    "SPHINCS+-SHAKE-128f-simple",
    "SPHINCS+-SHAKE-128s-simple",
    "SPHINCS+-SHAKE-192f-simple",
    "SPHINCS+-SHAKE-192s-simple",
    "SPHINCS+-SHAKE-256f-simple",
    "SPHINCS+-SHAKE-256s-simple",
];

/// The two primitive families the pipeline knows how to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    /// Key encapsulation mechanisms.
    Kem,
    /// Digital signatures.
    Sig,
}

impl Suite {
    /// Infers the suite from a measurement binary's file name.
    ///
    /// A name containing `kem` selects [`Suite::Kem`], otherwise one
    /// containing `sig` selects [`Suite::Sig`]. Matching is
    /// case-insensitive and `kem` wins when both appear.
    pub fn from_binary_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.contains("kem") {
            Some(Suite::Kem)
        } else if lower.contains("sig") {
            Some(Suite::Sig)
        } else {
            None
        }
    }

    /// Lowercase tag used in report metadata (`kem` / `sig`).
    pub fn label(self) -> &'static str {
        match self {
            Suite::Kem => "kem",
            Suite::Sig => "sig",
        }
    }

    /// Algorithms measured when no explicit filter is given.
    pub fn algorithms(self) -> &'static [&'static str] {
        match self {
            Suite::Kem => &KEM_ALGORITHMS,
            Suite::Sig => &SIG_ALGORITHMS,
        }
    }

    /// Operations the memory binary exposes, paired with the numeric code
    /// it expects as its second argument.
    pub fn memory_operations(self) -> &'static [(&'static str, u8)] {
        match self {
            Suite::Kem => &[("keygen", 0), ("encaps", 1), ("decaps", 2)],
            Suite::Sig => &[("keygen", 0), ("sign", 1), ("verify", 2)],
        }
    }

    /// Operation rows a speed report is expected to carry.
    ///
    /// The signature speed binary names its key generation `keypair`,
    /// unlike the memory binary.
    pub fn speed_operations(self) -> &'static [&'static str] {
        match self {
            Suite::Kem => &["keygen", "encaps", "decaps"],
            Suite::Sig => &["keypair", "sign", "verify"],
        }
    }

    /// Directory (under the results root) holding memory artifacts.
    pub fn memory_results_dir(self) -> &'static str {
        match self {
            Suite::Kem => "results_mem_kem",
            Suite::Sig => "results_mem_sig",
        }
    }

    /// File-name prefix of memory artifacts and aggregated memory reports.
    pub fn memory_artifact_prefix(self) -> &'static str {
        match self {
            Suite::Kem => "results_kem_mem_",
            Suite::Sig => "results_sig_mem_",
        }
    }

    /// Directory (under the results root) holding speed summaries.
    pub fn speed_results_dir(self) -> &'static str {
        match self {
            Suite::Kem => "results_speed_kem",
            Suite::Sig => "results_speed_sig",
        }
    }

    /// File-name prefix of speed summary reports.
    pub fn speed_file_prefix(self) -> &'static str {
        match self {
            Suite::Kem => "results_speed_kem_",
            Suite::Sig => "results_speed_sig_",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suite::Kem => write!(f, "KEM"),
            Suite::Sig => write!(f, "SIG"),
        }
    }
}
