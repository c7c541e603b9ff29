use rand::Rng;

/// Prefix of every topic name unless configured otherwise.
pub const DEFAULT_TOPIC_PREFIX: &str = "streamadapter";

const SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 8;

/// Name of the topic for `name`, or `None` if `name` is not usable in resource names.
#[must_use]
pub fn topic_id(prefix: &str, name: &str) -> Option<String> {
    if name.is_empty()
        || name.contains(['.', '*', '>', '/'])
        || name.chars().any(char::is_whitespace)
    {
        return None;
    }

    Some(format!("{prefix}_{name}"))
}

/// A fresh subscription name on `topic_id`.
///
/// The suffix is not a security primitive. A collision surfaces as a creation failure.
#[must_use]
pub fn subscription_id(topic_id: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())]))
        .collect();

    format!("{topic_id}_{suffix}")
}
