use rand::seq::IndexedRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "따뜻한", "행복한", "빛나는", "포근한", "활기찬", "지혜로운", "다정한", "용감한",
];

const NOUNS: &[&str] = &["자판기", "햇살", "구름", "별빛", "바람", "라떼", "우체통", "미소"];

/// Pen name the web client sends when the author leaves the field alone.
const PLACEHOLDER: &str = "익명";

/// Generates an "adjective noun" pen name, e.g. "포근한 구름".
pub fn generate_nickname<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("따뜻한");
    let noun = NOUNS.choose(rng).copied().unwrap_or("자판기");
    format!("{adjective} {noun}")
}

/// True when the submitted nickname should be replaced by a generated one.
pub fn needs_generated(nickname: Option<&str>) -> bool {
    match nickname.map(str::trim) {
        None => true,
        Some(n) => n.is_empty() || n == PLACEHOLDER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_nickname_has_two_known_parts() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let name = generate_nickname(&mut rng);
            let (adj, noun) = name.split_once(' ').unwrap();
            assert!(ADJECTIVES.contains(&adj), "unknown adjective in {name}");
            assert!(NOUNS.contains(&noun), "unknown noun in {name}");
        }
    }

    #[test]
    fn test_needs_generated() {
        assert!(needs_generated(None));
        assert!(needs_generated(Some("   ")));
        assert!(needs_generated(Some("익명")));
        assert!(!needs_generated(Some("푸른 바다 자판기")));
    }
}
