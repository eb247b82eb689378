use crate::trace::record::{ParamValue, ParameterRecord};
use crate::trace::tree::{Trace, TraceNode};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5f1c_2a9e_83d4_b067;

/// 128-bit trace digest, stable across platforms and runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

pub(crate) fn fingerprint_trace(trace: &Trace) -> TraceFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(trace.seed());
    write_node(&mut h, trace.root());
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> TraceFingerprint {
        let v = self.inner.digest128();
        TraceFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_node(h: &mut StableHasher, node: &TraceNode) {
    h.write_str(node.kind());
    match node.label() {
        Some(label) => {
            h.write_u8(1);
            h.write_str(label);
        }
        None => h.write_u8(0),
    }
    h.write_u32(node.branch());
    write_record(h, node.record());

    h.write_u32(node.children().len() as u32);
    for child in node.children() {
        write_node(h, child);
    }
}

fn write_record(h: &mut StableHasher, record: &ParameterRecord) {
    h.write_u32(record.len() as u32);
    for entry in record.entries() {
        h.write_str(&entry.name);
        match entry.value {
            ParamValue::Bool(b) => {
                h.write_u8(0);
                h.write_u8(u8::from(b));
            }
            ParamValue::Index(i) => {
                h.write_u8(1);
                h.write_u32(i);
            }
            ParamValue::Float(v) => {
                h.write_u8(2);
                h.write_u64(v.to_bits());
            }
            ParamValue::Int(v) => {
                h.write_u8(3);
                h.write_u64(v as u64);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/fingerprint.rs"]
mod tests;
