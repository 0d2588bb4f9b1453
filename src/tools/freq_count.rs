/// Returns a frequency count of every byte value in the input data.
pub fn freqs(data: &[u8]) -> Vec<u64> {
    let mut freqs = vec![0_u64; 256];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

/// Number of byte values that occur at least once.
pub fn distinct(freqs: &[u64]) -> usize {
    freqs.iter().filter(|&&f| f > 0).count()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn freqs_test() {
        let f = freqs(b"Making a silly test.");
        assert_eq!(f.len(), 256);
        assert_eq!(f[b'a' as usize], 2);
        assert_eq!(f[b'l' as usize], 2);
        assert_eq!(f[b' ' as usize], 3);
        assert_eq!(f[b'z' as usize], 0);
        assert_eq!(distinct(&f), 13);
    }
}
