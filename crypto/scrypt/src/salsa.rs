use crypto_common::erase::Erase;

const STATE_WORDS: usize = 16;
// double rounds; Salsa20/8 runs eight rounds in total
const DOUBLE_ROUNDS: usize = 4;

#[inline]
const fn quarter_round(a: usize, b: usize, c: usize, d: usize, state: &mut [u32; STATE_WORDS]) {
    state[b] ^= state[a].wrapping_add(state[d]).rotate_left(7);
    state[c] ^= state[b].wrapping_add(state[a]).rotate_left(9);
    state[d] ^= state[c].wrapping_add(state[b]).rotate_left(13);
    state[a] ^= state[d].wrapping_add(state[c]).rotate_left(18);
}

#[inline(always)]
fn run_rounds(state: &[u32; STATE_WORDS]) -> [u32; STATE_WORDS] {
    let mut res = *state;
    for _ in 0..DOUBLE_ROUNDS {
        // columns
        quarter_round(0, 4, 8, 12, &mut res);
        quarter_round(5, 9, 13, 1, &mut res);
        quarter_round(10, 14, 2, 6, &mut res);
        quarter_round(15, 3, 7, 11, &mut res);
        // rows
        quarter_round(0, 1, 2, 3, &mut res);
        quarter_round(5, 6, 7, 4, &mut res);
        quarter_round(10, 11, 8, 9, &mut res);
        quarter_round(15, 12, 13, 14, &mut res);
    }
    for (s1, s0) in res.iter_mut().zip(state.iter()) {
        *s1 = s1.wrapping_add(*s0);
    }
    res
}

/// Applies the Salsa20/8 core to a 64-byte block in place.
#[inline(always)]
pub fn salsa20_8(block: &mut [u8; 64]) {
    let mut words = [0; STATE_WORDS];
    for (w, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    let mut res = run_rounds(&words);
    for (chunk, val) in block.chunks_exact_mut(4).zip(res.iter()) {
        chunk.copy_from_slice(&val.to_le_bytes());
    }
    words.erase();
    res.erase();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_common::encoding::from_hex;

    // RFC 7914, section 8
    #[test]
    fn rfc7914_vector() {
        let mut block = [0; 64];
        from_hex(
            "7e879a214f3ec9867ca940e641718f26baee555b8c61c1b50df846116dcd3b1d\
             ee24f319df9b3d8514121e4b5ac5aa3276021d2909c74829edebc68db8b8c25e",
            &mut block,
        )
        .unwrap();
        let mut expected = [0; 64];
        from_hex(
            "a41f859c6608cc993b81cacb020cef05044b2181a2fd337dfd7b1c6396682f29\
             b4393168e3c9e6bcfe6bc5b7a06d96bae424cc102c91745c24ad673dc7618f81",
            &mut expected,
        )
        .unwrap();
        salsa20_8(&mut block);
        assert_eq!(block, expected);
    }

    #[test]
    fn zero_block_is_a_fixed_point() {
        let mut block = [0; 64];
        salsa20_8(&mut block);
        assert_eq!(block, [0; 64]);
    }
}
