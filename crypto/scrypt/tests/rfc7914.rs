use crypto_common::encoding::from_hex;
use scrypt::{
    derive, derive_with, native_available, scrypt_with, using_native_acceleration, Cancel,
    Error, ErrorKind, Implementation, Options, Params,
};
use std::{thread, time::Duration};

fn unhex(hex: &str) -> Vec<u8> {
    let mut out = vec![0; hex.len() / 2];
    from_hex(hex, &mut out).unwrap();
    out
}

struct Vector {
    password: &'static [u8],
    salt: &'static [u8],
    n: u64,
    r: u32,
    p: u32,
    expected: &'static str,
}

const VECTORS: [Vector; 3] = [
    Vector {
        password: b"",
        salt: b"",
        n: 16,
        r: 1,
        p: 1,
        expected: "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442\
                   fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906",
    },
    Vector {
        password: b"password",
        salt: b"NaCl",
        n: 1024,
        r: 8,
        p: 16,
        expected: "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162\
                   2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640",
    },
    Vector {
        password: b"pleaseletmein",
        salt: b"SodiumChloride",
        n: 16384,
        r: 8,
        p: 1,
        expected: "7023bdcb3afd7348461c06cd81fd38ebfda8fbba904f8e3ea9b543f6545da1f2\
                   d5432955613f0fcf62d49705242a9af9e61e85dc0d651e40dfcf017b45575887",
    },
];

fn check(v: &Vector, options: &Options) {
    let params = Params::from_cost(v.n, v.r, v.p).unwrap();
    let key = derive_with(v.password, v.salt, &params, options, 64).unwrap();
    assert_eq!(key.as_bytes(), unhex(v.expected), "N = {}, r = {}, p = {}", v.n, v.r, v.p);
}

#[test]
fn rfc7914_vectors() {
    for v in &VECTORS {
        check(v, &Options::default());
    }
}

#[test]
fn rfc7914_vectors_portable() {
    let options = Options::new().with_implementation(Implementation::Portable);
    for v in &VECTORS {
        check(v, &options);
    }
}

#[test]
fn rfc7914_vectors_native() {
    if !native_available() {
        return;
    }
    let options = Options::new().with_implementation(Implementation::Native);
    for v in &VECTORS {
        check(v, &options);
    }
}

// needs 1 GiB of scratch memory
#[test]
#[ignore]
fn rfc7914_large_vector() {
    let key = derive(b"pleaseletmein", b"SodiumChloride", 1 << 20, 8, 1, 64).unwrap();
    assert_eq!(
        key.as_bytes(),
        unhex(
            "2101cb9b6a511aaeaddbbe09cf70f881ec568d574a2ffd4dabe5ee9820adaa47\
             8e56fd8f4ba5d09ffa1c6d927c40f4c337304049e8a952fbcbf45c6fa77a41a4"
        )
    );
}

#[test]
fn native_matches_portable() {
    if !native_available() {
        return;
    }
    let params = Params::new(6, 3, 4).unwrap();
    for len in [1, 31, 32, 33, 100] {
        let portable = derive_with(
            b"correct horse",
            b"battery staple",
            &params,
            &Options::new().with_implementation(Implementation::Portable),
            len,
        )
        .unwrap();
        let native = derive_with(
            b"correct horse",
            b"battery staple",
            &params,
            &Options::new().with_implementation(Implementation::Native),
            len,
        )
        .unwrap();
        assert_eq!(portable, native, "dk_len = {len}");
        assert_eq!(native.len(), len);
    }
    assert!(using_native_acceleration());
}

#[test]
fn thread_count_does_not_change_output() {
    let params = Params::from_cost(256, 2, 9).unwrap();
    let sequential =
        derive_with(b"pw", b"salt", &params, &Options::new().with_threads(1), 48).unwrap();
    for threads in [2, 4, 9, 32] {
        let parallel = derive_with(
            b"pw",
            b"salt",
            &params,
            &Options::new().with_threads(threads),
            48,
        )
        .unwrap();
        assert_eq!(parallel, sequential, "threads = {threads}");
    }
}

#[test]
fn deterministic_and_prefix_stable() {
    let long = derive(b"pw", b"salt", 64, 1, 2, 80).unwrap();
    let again = derive(b"pw", b"salt", 64, 1, 2, 80).unwrap();
    let short = derive(b"pw", b"salt", 64, 1, 2, 20).unwrap();
    assert_eq!(long, again);
    assert_eq!(short.as_bytes(), &long.as_bytes()[..20]);
    assert_ne!(derive(b"pw", b"pepper", 64, 1, 2, 80).unwrap(), long);
}

#[test]
fn rejects_invalid_parameters() {
    for (n, r, p) in [(0, 1, 1), (1, 1, 1), (15, 1, 1), (1000, 8, 1), (16, 0, 1), (16, 1, 0)] {
        let err = derive(b"pw", b"salt", n, r, p, 32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "N = {n}, r = {r}, p = {p}");
    }
    assert_eq!(
        derive(b"pw", b"salt", 16, 1, 1, 0).unwrap_err(),
        Error::InvalidOutputLen
    );
}

// 8 MiB of scratch with N far above 2^(16 * r)
#[test]
fn large_cost_with_single_block() {
    let key = derive(b"pw", b"salt", 1 << 16, 1, 1, 32).unwrap();
    assert_eq!(key.len(), 32);
    let portable = Options::new().with_implementation(Implementation::Portable);
    let params = Params::new(16, 1, 1).unwrap();
    assert_eq!(derive_with(b"pw", b"salt", &params, &portable, 32).unwrap(), key);
}

#[test]
fn memory_ceiling_is_checked_first() {
    let params = Params::from_cost(1 << 10, 8, 4).unwrap();
    let options = Options::new().with_threads(2).with_max_memory(1 << 20);
    let mut out = [0xaa; 32];
    let err = scrypt_with(b"pw", b"salt", &params, &options, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(
        err,
        Error::MemoryLimit {
            required: params.memory_required(2).unwrap(),
            limit: 1 << 20,
        }
    );
    assert_eq!(out, [0; 32]);

    // a single worker fits
    let options = Options::new().with_threads(1).with_max_memory(2 << 20);
    scrypt_with(b"pw", b"salt", &params, &options, &mut out).unwrap();
}

#[test]
fn native_request_without_support() {
    if native_available() {
        return;
    }
    let options = Options::new().with_implementation(Implementation::Native);
    let err = derive_with(b"pw", b"salt", &Params::default(), &options, 32).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn cancelled_before_start() {
    let cancel = Cancel::new();
    cancel.cancel();
    let options = Options::new().with_cancel(cancel);
    let mut out = [0; 32];
    let err = scrypt_with(b"pw", b"salt", &Params::default(), &options, &mut out).unwrap_err();
    assert_eq!(err, Error::Cancelled);
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

#[test]
fn cancelled_while_running() {
    // 128 MiB of scratch, long enough to still be running when cancelled
    let params = Params::new(17, 8, 1).unwrap();
    let cancel = Cancel::new();
    let options = Options::new().with_cancel(cancel.clone());
    let worker = thread::spawn(move || derive_with(b"pw", b"salt", &params, &options, 32));
    thread::sleep(Duration::from_millis(20));
    cancel.cancel();
    let res = worker.join().unwrap();
    assert_eq!(res.unwrap_err(), Error::Cancelled);
}
