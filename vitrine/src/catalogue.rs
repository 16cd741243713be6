use super::types::{Category, CategoryId, Game, Promotion};

pub const CATEGORIES: [Category; 5] = [
    Category { id: CategoryId::Pop, label: "Populaires" },
    Category { id: CategoryId::Slots, label: "Machines à sous" },
    Category { id: CategoryId::Table, label: "Jeux de table" },
    Category { id: CategoryId::Live, label: "Live Casino" },
    Category { id: CategoryId::Jackpot, label: "Jackpots" },
];

pub const GAMES: [Game; 12] = [
    game("g1", "Trésor Aztec", CategoryId::Slots, "Studio A", 96.2, "Moyenne", "/images/games/aztec-treasure.jpg"),
    game("g2", "Roulette Royale", CategoryId::Table, "Studio B", 97.3, "—", "/images/games/roulette-royale.jpg"),
    game("g3", "Blackjack Pro", CategoryId::Table, "Studio B", 99.4, "—", "/images/games/blackjack-pro.jpg"),
    game("g4", "Mine d'Or", CategoryId::Slots, "Studio C", 95.1, "Élevée", "/images/games/mine-or.jpg"),
    game("g5", "Mega Roue (Live)", CategoryId::Live, "Studio Live", 95.8, "—", "/images/games/mega-roue.jpg"),
    game("g6", "Fortune Fruits", CategoryId::Slots, "Studio A", 96.0, "Faible", "/images/games/fortune-fruits.jpg"),
    game("g7", "Jackpot Nuit", CategoryId::Jackpot, "Studio D", 94.0, "Très élevée", "/images/games/jackpot-nuit.jpg"),
    game("g8", "Poker 3 Cartes", CategoryId::Table, "Studio B", 97.7, "—", "/images/games/poker-3cartes.jpg"),
    game("g9", "Wild West", CategoryId::Slots, "Studio C", 96.7, "Élevée", "/images/games/wild-west.jpg"),
    game("g10", "Lightning Roulette", CategoryId::Live, "Studio Live", 97.1, "—", "/images/games/lightning-roulette.jpg"),
    game("g11", "Bingo Pop", CategoryId::Pop, "Studio Fun", 95.0, "Faible", "/images/games/bingo-pop.jpg"),
    game("g12", "Book of Luck", CategoryId::Slots, "Studio E", 96.4, "Moyenne", "/images/games/book-of-luck.jpg"),
];

pub const PROMOTIONS: [Promotion; 3] = [
    Promotion {
        id: 1,
        title: "Bonus de bienvenue 100%",
        text: "Déposez maintenant et recevez le double.",
    },
    Promotion {
        id: 2,
        title: "Tournois exclusifs",
        text: "Classements réguliers et récompenses généreuses.",
    },
    Promotion {
        id: 3,
        title: "Cashback hebdomadaire",
        text: "5% de retour sur vos sessions.",
    },
];

const fn game(
    id: &'static str,
    title: &'static str,
    category: CategoryId,
    provider: &'static str,
    rtp: f32,
    volatility: &'static str,
    image: &'static str,
) -> Game {
    Game {
        id,
        title,
        category,
        provider,
        rtp,
        volatility,
        image,
    }
}

/// Category filter plus title search, as entered on the catalogue page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueFilter {
    pub category: CategoryId,
    pub query: String,
}

impl CatalogueFilter {
    pub fn new(category: CategoryId, query: impl Into<String>) -> Self {
        Self {
            category,
            query: query.into(),
        }
    }

    pub fn apply(&self) -> Vec<&'static Game> {
        filter_games(self.category, &self.query)
    }
}

/// Linear scan over the fixed game list.
///
/// `CategoryId::Pop` keeps every game; any other category keeps only the games
/// filed under it. The query matches a case-insensitive substring of the title,
/// and an empty query matches everything.
pub fn filter_games(category: CategoryId, query: &str) -> Vec<&'static Game> {
    let needle = query.to_lowercase();
    GAMES
        .iter()
        .filter(|game| category == CategoryId::Pop || game.category == category)
        .filter(|game| game.title.to_lowercase().contains(&needle))
        .collect()
}

pub fn find_game(id: &str) -> Option<&'static Game> {
    GAMES.iter().find(|game| game.id == id)
}

pub fn category(id: CategoryId) -> &'static Category {
    // Every CategoryId variant has an entry
    CATEGORIES
        .iter()
        .find(|category| category.id == id)
        .unwrap_or(&CATEGORIES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_with_empty_query_returns_everything() {
        let games = filter_games(CategoryId::Pop, "");
        assert_eq!(games.len(), GAMES.len());

        // Order is the catalogue order
        let ids: Vec<&str> = games.iter().map(|g| g.id).collect();
        let expected: Vec<&str> = GAMES.iter().map(|g| g.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_category_filter_keeps_only_that_category() {
        for category in [
            CategoryId::Slots,
            CategoryId::Table,
            CategoryId::Live,
            CategoryId::Jackpot,
        ] {
            let games = filter_games(category, "");
            assert!(!games.is_empty());
            assert!(games.iter().all(|g| g.category == category));
        }

        assert_eq!(filter_games(CategoryId::Slots, "").len(), 5);
        assert_eq!(filter_games(CategoryId::Table, "").len(), 3);
        assert_eq!(filter_games(CategoryId::Jackpot, "").len(), 1);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let games = filter_games(CategoryId::Pop, "ROULETTE");
        let ids: Vec<&str> = games.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["g2", "g10"]);

        // Accented titles lower-case too
        let games = filter_games(CategoryId::Pop, "TRÉSOR");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, "g1");
    }

    #[test]
    fn test_query_and_category_combine() {
        let games = filter_games(CategoryId::Live, "roulette");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "Lightning Roulette");

        assert!(filter_games(CategoryId::Slots, "roulette").is_empty());
    }

    #[test]
    fn test_unmatched_query_returns_nothing() {
        assert!(filter_games(CategoryId::Pop, "baccarat").is_empty());
    }

    #[test]
    fn test_catalogue_filter_default_shows_all() {
        let filter = CatalogueFilter::default();
        assert_eq!(filter.category, CategoryId::Pop);
        assert_eq!(filter.apply().len(), GAMES.len());

        let filter = CatalogueFilter::new(CategoryId::Slots, "fruits");
        assert_eq!(filter.apply()[0].id, "g6");
    }

    #[test]
    fn test_find_game() {
        assert_eq!(find_game("g7").unwrap().title, "Jackpot Nuit");
        assert!(find_game("g99").is_none());
    }

    #[test]
    fn test_every_category_has_a_label() {
        for entry in CATEGORIES {
            assert_eq!(category(entry.id).label, entry.label);
        }
    }

    #[test]
    fn test_game_ids_are_unique() {
        let mut ids: Vec<&str> = GAMES.iter().map(|g| g.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), GAMES.len());
    }
}
