//! Keccak-256 with the original (pre-SHA-3) padding.
//!
//! Sponge parameters: 1600-bit state, 1088-bit rate (136 bytes), 512-bit
//! capacity, 24 rounds of Keccak-f[1600], 256-bit digest. Padding appends the
//! domain byte `0x01` after the message and sets the top bit of the last rate
//! byte, which is what Ethereum calls `keccak256`.

/// Rate in bytes.
const RATE: usize = 136;

/// Digest length in bytes.
const DIGEST_LEN: usize = 32;

const ROUND_CONSTANTS: [u64; 24] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808A,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808B,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008A,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000A,
    0x0000_0000_8000_808B,
    0x8000_0000_0000_008B,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800A,
    0x8000_0000_8000_000A,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// Rotation offsets along the rho/pi walk starting from lane (1, 0).
const RHO: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Lane visited at each step of the rho/pi walk (index `x + 5 * y`).
const PI: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// Errors from [`keccak256`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// Text input is hashed byte-per-character, so only ASCII is accepted.
    #[error(
        "keccak256: input must be string of ASCII-only characters: found character code {codepoint} at offset {offset}"
    )]
    NonAscii { codepoint: u32, offset: usize },
}

/// Hash an ASCII string, returning 64 lowercase hex characters.
pub fn keccak256(message: &str) -> Result<String, HashError> {
    if let Some((offset, c)) = message.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(HashError::NonAscii {
            codepoint: c as u32,
            offset,
        });
    }

    let digest = keccak256_bytes(message.as_bytes());
    Ok(to_hex(&digest))
}

/// Hash raw bytes.
pub fn keccak256_bytes(message: &[u8]) -> [u8; DIGEST_LEN] {
    let mut sponge = Sponge::new();
    sponge.absorb(message);
    sponge.finish()
}

fn to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

struct Sponge {
    state: [u64; 25],
    /// Bytes absorbed into the current block.
    count: usize,
}

impl Sponge {
    fn new() -> Self {
        Self {
            state: [0; 25],
            count: 0,
        }
    }

    fn xor_byte(&mut self, index: usize, byte: u8) {
        self.state[index / 8] ^= (byte as u64) << (8 * (index % 8));
    }

    fn absorb(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.xor_byte(self.count, b);
            self.count += 1;
            if self.count == RATE {
                keccak_f(&mut self.state);
                self.count = 0;
            }
        }
    }

    fn finish(mut self) -> [u8; DIGEST_LEN] {
        self.xor_byte(self.count, 0x01);
        self.xor_byte(RATE - 1, 0x80);
        keccak_f(&mut self.state);

        let mut out = [0u8; DIGEST_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = (self.state[i / 8] >> (8 * (i % 8))) as u8;
        }
        out
    }
}

fn keccak_f(a: &mut [u64; 25]) {
    for rc in ROUND_CONSTANTS {
        // theta
        let mut c = [0u64; 5];
        for (x, col) in c.iter_mut().enumerate() {
            *col = a[x] ^ a[x + 5] ^ a[x + 10] ^ a[x + 15] ^ a[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                a[5 * y + x] ^= d;
            }
        }

        // rho and pi
        let mut last = a[1];
        for (&lane, &rot) in PI.iter().zip(RHO.iter()) {
            let next = a[lane];
            a[lane] = last.rotate_left(rot);
            last = next;
        }

        // chi
        for y in 0..5 {
            let row = [a[5 * y], a[5 * y + 1], a[5 * y + 2], a[5 * y + 3], a[5 * y + 4]];
            for x in 0..5 {
                a[5 * y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
            }
        }

        // iota
        a[0] ^= rc;
    }
}
