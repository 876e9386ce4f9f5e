//! Texts shared by the matcher tests.

/// Texts grouped by the distance of their best "oranges" occurrence.
pub(super) const ORANGES: [(Option<u32>, &[&str]); 5] = [
    (Some(0), &["I like oranges", "oranges are nice"]),
    (
        Some(1),
        &["I like orange", "I like ornges", "orangles are nice", "oronges are cool"],
    ),
    (
        Some(2),
        &["I like ornge", "I like orngaes", "orlangles are nice", "orongkes are cool"],
    ),
    (
        Some(3),
        &["I like orne", "I like orngaees", "orflangles are nice", "orlongkes are cool"],
    ),
    (
        None,
        &["I like potaters", "hockey is cool sport", "That will be 4 bux baby"],
    ),
];
