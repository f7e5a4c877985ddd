use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Faq,
    Movie,
    Feedback,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Faq, Collection::Movie, Collection::Feedback];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Faq => "faq",
            Collection::Movie => "movie",
            Collection::Feedback => "feedback",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "faq" => Ok(Collection::Faq),
            "movie" | "movies" | "filmes" => Ok(Collection::Movie),
            "feedback" | "feedbacks" | "avaliacoes" => Ok(Collection::Feedback),
            _ => Err(format!("Unknown collection: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("FAQ".parse::<Collection>().unwrap(), Collection::Faq);
        assert_eq!("filmes".parse::<Collection>().unwrap(), Collection::Movie);
        assert_eq!("avaliacoes".parse::<Collection>().unwrap(), Collection::Feedback);
        assert!("books".parse::<Collection>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for c in Collection::ALL {
            assert_eq!(c.to_string().parse::<Collection>().unwrap(), c);
        }
    }
}
