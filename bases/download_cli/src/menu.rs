// bases/download_cli/src/menu.rs
use std::num::NonZeroU32;

pub const DEFAULT_MAX_RESULTS: NonZeroU32 = match NonZeroU32::new(10) {
    Some(value) => value,
    None => unreachable!(),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SingleLink,
    PlaylistLink,
    ArtistSearch,
    GenreSearch,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::SingleLink,
        MenuChoice::PlaylistLink,
        MenuChoice::ArtistSearch,
        MenuChoice::GenreSearch,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::SingleLink => 1,
            MenuChoice::PlaylistLink => 2,
            MenuChoice::ArtistSearch => 3,
            MenuChoice::GenreSearch => 4,
            MenuChoice::Exit => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::SingleLink => "Download a single song from a link",
            MenuChoice::PlaylistLink => "Download a playlist from a link",
            MenuChoice::ArtistSearch => "Search songs by artist",
            MenuChoice::GenreSearch => "Search songs by genre",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let number: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|choice| choice.number() == number)
    }
}

/// Result count read from the user; `defaulted` is set when the input was
/// unusable and the default was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxResults {
    pub value: NonZeroU32,
    pub defaulted: bool,
}

pub fn parse_max_results(input: &str) -> MaxResults {
    match input.trim().parse::<NonZeroU32>() {
        Ok(value) => MaxResults {
            value,
            defaulted: false,
        },
        Err(_) => MaxResults {
            value: DEFAULT_MAX_RESULTS,
            defaulted: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(MenuChoice::SingleLink))]
    #[case(" 2 ", Some(MenuChoice::PlaylistLink))]
    #[case("3\n", Some(MenuChoice::ArtistSearch))]
    #[case("4", Some(MenuChoice::GenreSearch))]
    #[case("5", Some(MenuChoice::Exit))]
    #[case("0", None)]
    #[case("6", None)]
    #[case("artist", None)]
    #[case("", None)]
    fn test_parse_choice(#[case] input: &str, #[case] expected: Option<MenuChoice>) {
        assert_eq!(MenuChoice::parse(input), expected);
    }

    #[test]
    fn test_numbers_are_unique_and_sequential() {
        let numbers: Vec<u8> = MenuChoice::ALL.iter().map(|c| c.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_valid_count_is_used() {
        let max = parse_max_results(" 25 ");
        assert_eq!(max.value.get(), 25);
        assert!(!max.defaulted);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("0")]
    #[case("-3")]
    #[case("2.5")]
    fn test_unusable_count_falls_back_to_default(#[case] input: &str) {
        let max = parse_max_results(input);
        assert_eq!(max.value, DEFAULT_MAX_RESULTS);
        assert_eq!(max.value.get(), 10);
        assert!(max.defaulted);
    }
}
