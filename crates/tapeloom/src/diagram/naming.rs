//! Default state names: `A` to `Z`, then `AA`, `AB`, and so on.

/// The `index`-th name of the sequence, counting from zero.
pub fn sequence_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// The first name of the sequence for which `is_taken` is false.
pub fn first_free_name(is_taken: impl Fn(&str) -> bool) -> String {
    (0..)
        .map(sequence_name)
        .find(|name| !is_taken(name))
        .unwrap_or_default()
}
