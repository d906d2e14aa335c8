// src/bin/cb.rs

// Short alias: the same program as `crowbar`.
include!("crowbar.rs");
