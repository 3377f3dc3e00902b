// src/matching/variations.rs - Given-name nickname/diminutive lookup
use anyhow::Context;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::SearchError;
use crate::matching::normalize::normalize_name;

/// Built-in full name -> common short forms. Replaceable via `NICKNAME_TABLE_PATH`.
const DEFAULT_NAME_VARIATIONS: &[(&str, &[&str])] = &[
    ("ALEXANDER", &["ALEX", "AL", "SANDY", "XANDER"]),
    ("ALAN", &["AL"]),
    ("ANDREW", &["ANDY", "DREW"]),
    ("ANTHONY", &["TONY", "ANT"]),
    ("ARTHUR", &["ART", "ARTIE", "ARCHIE"]),
    ("BARBARA", &["BARB", "BOBBIE"]),
    ("BENJAMIN", &["BEN", "BENNY"]),
    ("CATHERINE", &["KATE", "CATHY", "CAT"]),
    ("CHARLES", &["CHARLIE", "CHUCK"]),
    ("CHRISTOPHER", &["CHRIS", "KIT"]),
    ("CHRISTIAN", &["CHRIS"]),
    ("DANIEL", &["DAN", "DANNY"]),
    ("DAVID", &["DAVE", "DAVEY"]),
    ("DEBORAH", &["DEB", "DEBBIE"]),
    ("DONALD", &["DON", "DONNY"]),
    ("DOUGLAS", &["DOUG", "DOUGIE"]),
    ("EDWARD", &["ED", "EDDIE", "TED"]),
    ("ELIZABETH", &["LIZ", "BETH", "BETTY", "ELIZA"]),
    ("EUGENE", &["GENE"]),
    ("GREGORY", &["GREG", "GREGG"]),
    ("HAROLD", &["HARRY", "HAL"]),
    ("HENRY", &["HANK", "HARRY"]),
    ("JACOB", &["JAKE", "COBY"]),
    ("JAMES", &["JIM", "JIMMY", "JAMIE"]),
    ("JENNIFER", &["JEN", "JENNY", "JENN"]),
    ("JEFFREY", &["JEFF"]),
    ("JONATHAN", &["JOHN", "JON", "JOHNNY"]),
    ("JOHN", &["JOHNNY", "JACK"]),
    ("JOSEPH", &["JOE", "JOEY"]),
    ("JOSHUA", &["JOSH"]),
    ("KATHERINE", &["KATE", "KATHY", "KATIE"]),
    ("KENNETH", &["KEN", "KENNY"]),
    ("KIMBERLY", &["KIM"]),
    ("LAWRENCE", &["LARRY"]),
    ("LOUIS", &["LOU", "LOUIE"]),
    ("MARGARET", &["MAGGIE", "PEGGY", "MEG"]),
    ("MATTHEW", &["MATT", "MATTY"]),
    ("MICHAEL", &["MIKE", "MICK", "MICKEY"]),
    ("NATHAN", &["NATE"]),
    ("NICHOLAS", &["NICK", "NICKY"]),
    ("PATRICIA", &["PAT", "PATTY", "TRISH"]),
    ("PATRICK", &["PAT", "PADDY"]),
    ("PETER", &["PETE"]),
    ("PHILLIP", &["PHIL"]),
    ("PHILIP", &["PHIL"]),
    ("RAYMOND", &["RAY"]),
    ("REBECCA", &["BECCA", "BECKY"]),
    ("RICHARD", &["RICK", "DICK", "RICHIE"]),
    ("ROBERT", &["ROB", "BOB", "BOBBY", "ROBBIE"]),
    ("RONALD", &["RON", "RONNY"]),
    ("RUSSELL", &["RUSS", "RUSTY"]),
    ("SAMANTHA", &["SAM", "SAMMY"]),
    ("SAMUEL", &["SAM", "SAMMY"]),
    ("STEPHANIE", &["STEPH"]),
    ("STEPHEN", &["STEVE", "STEVIE"]),
    ("STEVEN", &["STEVE", "STEVIE"]),
    ("THOMAS", &["TOM", "TOMMY"]),
    ("TIMOTHY", &["TIM", "TIMMY"]),
    ("WALTER", &["WALT", "WALLY"]),
    ("WILLIAM", &["WILL", "BILL", "BILLY", "LIAM"]),
    ("ZACHARY", &["ZACH", "ZACK"]),
];

/// Symmetric nickname equivalence. Two tokens are variants when one is a
/// short form of the other, or both are short forms of the same full name.
#[derive(Debug, Clone, Default)]
pub struct NicknameTable {
    /// token -> full names it stands for (a full name maps to itself)
    roots: HashMap<String, HashSet<String>>,
}

impl NicknameTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::from_entries(
            DEFAULT_NAME_VARIATIONS
                .iter()
                .map(|(full, nicks)| (full.to_string(), nicks.iter().map(|n| n.to_string()).collect())),
        )
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut table = Self::empty();
        for (full, nicknames) in entries {
            let full = normalize_name(&full);
            if full.is_empty() {
                continue;
            }
            table.add_root(&full, &full);
            for nickname in nicknames {
                let nickname = normalize_name(&nickname);
                if !nickname.is_empty() && nickname != full {
                    table.add_root(&nickname, &full);
                }
            }
        }
        table
    }

    /// Loads a JSON object of `{ "FULL NAME": ["NICK", ...] }`.
    pub fn from_json_file(path: &Path) -> Result<Self, SearchError> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read nickname table {}", path.display()))
            .map_err(|e| SearchError::InputFile(format!("{:#}", e)))?;
        let entries: HashMap<String, Vec<String>> = serde_json::from_str(&raw).map_err(|e| {
            SearchError::InputFile(format!("Invalid nickname table {}: {}", path.display(), e))
        })?;
        Ok(Self::from_entries(entries))
    }

    fn add_root(&mut self, token: &str, full: &str) {
        self.roots
            .entry(token.to_string())
            .or_default()
            .insert(full.to_string());
    }

    pub fn are_variants(&self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        match (self.roots.get(a), self.roots.get(b)) {
            (Some(ra), Some(rb)) => !ra.is_disjoint(rb),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
