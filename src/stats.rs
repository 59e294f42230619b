/// GitHub profile numbers shown on the stats card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsRecord {
    pub repos: u32,
    pub commits: u32,
    pub stars: u32,
    pub followers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKey {
    Repos,
    Commits,
    Stars,
    Followers,
}

impl StatKey {
    pub const ALL: [StatKey; 4] = [
        StatKey::Repos,
        StatKey::Commits,
        StatKey::Stars,
        StatKey::Followers,
    ];

    /// Default element id for this stat.
    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::Repos => "repos",
            StatKey::Commits => "commits",
            StatKey::Stars => "stars",
            StatKey::Followers => "followers",
        }
    }

    /// Row label used on the SVG card.
    pub fn label(self) -> &'static str {
        match self {
            StatKey::Repos => "Repos",
            StatKey::Commits => "Commits",
            StatKey::Stars => "Stars",
            StatKey::Followers => "Followers",
        }
    }
}

impl StatsRecord {
    pub fn get(&self, key: StatKey) -> u32 {
        match key {
            StatKey::Repos => self.repos,
            StatKey::Commits => self.commits,
            StatKey::Stars => self.stars,
            StatKey::Followers => self.followers,
        }
    }
}
