//! Word classes and gazetteers used by the entity extractor.
//!
//! Every closed word class the tagger relies on is listed here so the
//! heuristics can be tuned in one place and inspected from tests. Lookups
//! are case-insensitive; the lists are stored lower-case.
//!
//! Place and person-title entries may span several words ("new york",
//! "prime minister"); [`longest_place_at`] and [`title_run_at`] do the
//! multi-word matching.

use once_cell::sync::Lazy;
use std::collections::HashSet;

pub const ARTICLES: &[&str] = &["a", "an", "the"];

pub const PREPOSITIONS: &[&str] = &[
    "aboard", "about", "above", "across", "after", "against", "along", "amid", "amidst", "among",
    "around", "as", "at", "atop", "before", "behind", "below", "beneath", "beside", "besides",
    "between", "beyond", "by", "despite", "down", "during", "except", "for", "from", "in",
    "inside", "into", "like", "near", "of", "off", "on", "onto", "out", "outside", "over", "past",
    "per", "since", "than", "through", "throughout", "till", "to", "toward", "towards", "under",
    "underneath", "unlike", "until", "up", "upon", "via", "with", "within", "without",
];

pub const CONJUNCTIONS: &[&str] = &[
    "and", "but", "or", "nor", "so", "yet", "although", "because", "if", "unless", "while",
    "whereas", "though", "whether", "once", "when", "whenever", "where", "after", "before",
];

/// Pronouns, determiners, and auxiliaries: never nouns, never subjects.
pub const FUNCTION_WORDS: &[&str] = &[
    "i", "me", "my", "we", "us", "our", "you", "your", "he", "him", "his", "she", "her", "it",
    "its", "they", "them", "their", "this", "that", "these", "those", "who", "whom", "whose",
    "what", "which", "is", "are", "was", "were", "be", "been", "being", "am", "has", "have",
    "had", "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may",
    "might", "must", "not", "no", "all", "any", "some", "each", "every", "more", "most", "much",
    "many", "few", "other", "such", "own", "same", "very", "just", "also", "now", "then", "here",
    "there", "how", "why", "amid", "vs", "via",
];

/// Verbs common in headlines, base and inflected forms.
pub const VERBS: &[&str] = &[
    "say", "says", "said", "visit", "visits", "visited", "meet", "meets", "met", "announce",
    "announces", "announced", "launch", "launches", "launched", "win", "wins", "won", "lose",
    "loses", "lost", "call", "calls", "called", "warn", "warns", "warned", "hit", "hits", "rise",
    "rises", "rose", "fall", "falls", "fell", "plan", "plans", "planned", "open", "opens",
    "opened", "close", "closes", "closed", "face", "faces", "faced", "get", "gets", "got", "make",
    "makes", "made", "take", "takes", "took", "seek", "seeks", "sought", "urge", "urges", "urged",
    "vow", "vows", "vowed", "sign", "signs", "signed", "unveil", "unveils", "unveiled", "reveal",
    "reveals", "revealed", "claim", "claims", "claimed", "report", "reports", "reported", "kill",
    "kills", "killed", "die", "dies", "died", "hold", "holds", "held", "back", "backs", "backed",
    "ban", "bans", "banned", "cut", "cuts", "raise", "raises", "raised", "boost", "boosts",
    "boosted", "slam", "slams", "slammed", "join", "joins", "joined", "leave", "leaves", "left",
    "quit", "quits", "buy", "buys", "bought", "sell", "sells", "sold", "build", "builds", "built",
    "begin", "begins", "began", "end", "ends", "ended", "start", "starts", "started", "arrive",
    "arrives", "arrived", "return", "returns", "returned", "strike", "strikes", "struck", "sweep",
    "sweeps", "swept", "approve", "approves", "approved", "reject", "rejects", "rejected", "elect",
    "elects", "elected", "arrest", "arrests", "arrested", "charge", "charges", "charged", "hits",
    "set", "sets", "beat", "beats", "defeat", "defeats", "defeated", "discuss", "discusses",
    "discussed", "host", "hosts", "hosted", "celebrate", "celebrates", "celebrated", "mark",
    "marks", "marked", "expand", "expands", "expanded", "need", "needs", "needed", "see", "sees",
    "saw", "show", "shows", "showed", "give", "gives", "gave", "go", "goes", "went", "come",
    "comes", "came", "become", "becomes", "became", "keep", "keeps", "kept", "help", "helps",
    "helped", "find", "finds", "found", "hits", "storm", "storms", "soar", "soars", "soared",
    "plunge", "plunges", "plunged", "surge", "surges", "surged", "drop", "drops", "dropped",
    "lead", "leads", "led", "wants", "want", "wanted", "amid", "inaugurate", "inaugurates",
    "inaugurated", "address", "addresses", "addressed", "resign", "resigns", "resigned", "pass", "passes",
    "passed",
];

/// Adjectives and adverbs frequent in headlines.
pub const MODIFIERS: &[&str] = &[
    "new", "big", "major", "minor", "high", "low", "top", "key", "first", "last", "next", "late",
    "early", "former", "young", "old", "global", "local", "national", "international", "public",
    "private", "huge", "small", "large", "latest", "record", "historic", "massive", "deadly",
    "heavy", "free", "full", "final", "official", "annual", "strong", "weak", "rare", "fresh",
    "live", "breaking", "again", "still", "only", "even", "over", "ahead", "today", "tomorrow",
    "yesterday", "soon", "amid",
];

/// Words that introduce a named person ("President", "Prime Minister").
pub const PERSON_TITLES: &[&str] = &[
    "mr", "mrs", "ms", "miss", "dr", "prof", "professor", "sir", "dame", "lord", "lady", "president",
    "vice president", "prime minister", "deputy prime minister", "minister", "chancellor",
    "senator", "sen", "rep", "representative", "governor", "gov", "mayor", "king", "queen",
    "prince", "princess", "pope", "sheikh", "emir", "sultan", "ceo", "chairman", "chairwoman",
    "judge", "justice", "general", "gen", "captain", "capt", "coach", "secretary",
    "ambassador", "speaker", "chief minister", "home minister", "finance minister",
    "foreign minister", "saint", "st",
];

/// Given names that mark the start of a person's name.
pub const GIVEN_NAMES: &[&str] = &[
    "joe", "donald", "barack", "hillary", "kamala", "elon", "jeff", "bill", "mark", "tim",
    "sundar", "satya", "narendra", "rahul", "xi", "vladimir", "volodymyr", "emmanuel", "olaf",
    "rishi", "keir", "boris", "justin", "angela", "taylor", "lionel", "cristiano", "roger",
    "rafael", "novak", "serena", "lebron", "michael", "john", "james", "robert", "david",
    "william", "richard", "thomas", "charles", "george", "paul", "peter", "mary", "elizabeth",
    "sarah", "jennifer", "linda", "susan", "emma", "olivia", "sophia", "anna", "maria", "ram",
    "sher", "pushpa", "kp", "prachanda", "bidya", "balen", "rabi", "gagan", "sita", "hari",
    "krishna", "shiva", "binod", "suresh", "ramesh", "mahesh", "anil", "sunil", "nirmala",
];

/// Countries, regions, and cities, lower-case; multi-word entries allowed.
pub const PLACES: &[&str] = &[
    // Nepal and neighbours
    "nepal", "kathmandu", "pokhara", "lalitpur", "bhaktapur", "chitwan", "lumbini", "biratnagar",
    "birgunj", "dharan", "butwal", "janakpur", "nepalgunj", "dhangadhi", "hetauda", "everest",
    "mount everest", "annapurna", "mustang", "karnali", "gandaki", "koshi", "madhesh", "bagmati",
    "lumbini province", "sudurpaschim", "terai", "himalaya", "himalayas", "india", "new delhi",
    "delhi", "mumbai", "kolkata", "bangalore", "bengaluru", "chennai", "hyderabad", "china",
    "beijing", "shanghai", "hong kong", "tibet", "lhasa", "bhutan", "thimphu", "bangladesh",
    "dhaka", "pakistan", "islamabad", "karachi", "lahore", "sri lanka", "colombo", "maldives",
    "afghanistan", "kabul",
    // Americas
    "united states", "usa", "us", "america", "new york", "new york city", "washington",
    "los angeles", "san francisco", "chicago", "houston", "boston", "miami", "seattle",
    "las vegas", "texas", "california", "florida", "alaska", "hawaii", "canada", "toronto",
    "ottawa", "vancouver", "mexico", "mexico city", "brazil", "rio de janeiro", "sao paulo",
    "argentina", "buenos aires", "chile", "peru", "colombia", "venezuela", "cuba",
    // Europe
    "europe", "united kingdom", "uk", "britain", "england", "scotland", "wales", "ireland",
    "london", "paris", "france", "germany", "berlin", "italy", "rome", "spain", "madrid",
    "portugal", "lisbon", "netherlands", "amsterdam", "belgium", "brussels", "switzerland",
    "geneva", "zurich", "austria", "vienna", "sweden", "stockholm", "norway", "oslo", "denmark",
    "finland", "poland", "warsaw", "ukraine", "kyiv", "kiev", "russia", "moscow", "greece",
    "athens", "turkey", "istanbul", "ankara",
    // Middle East and Africa
    "israel", "jerusalem", "tel aviv", "gaza", "west bank", "palestine", "lebanon", "beirut",
    "syria", "damascus", "iraq", "baghdad", "iran", "tehran", "saudi arabia", "riyadh", "qatar",
    "doha", "dubai", "abu dhabi", "united arab emirates", "uae", "yemen", "egypt", "cairo",
    "africa", "south africa", "nigeria", "lagos", "kenya", "nairobi", "ethiopia", "sudan",
    "morocco",
    // Asia-Pacific
    "asia", "japan", "tokyo", "osaka", "south korea", "north korea", "korea", "seoul",
    "pyongyang", "taiwan", "taipei", "vietnam", "hanoi", "thailand", "bangkok", "malaysia",
    "kuala lumpur", "singapore", "indonesia", "jakarta", "bali", "philippines", "manila",
    "myanmar", "australia", "sydney", "melbourne", "canberra", "new zealand", "auckland",
    // Others
    "antarctica", "arctic", "pacific", "atlantic", "middle east", "silicon valley", "wall street",
];

fn to_set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

static ARTICLE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(ARTICLES));
static PREPOSITION_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(PREPOSITIONS));
static CONJUNCTION_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(CONJUNCTIONS));
static FUNCTION_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(FUNCTION_WORDS));
static VERB_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(VERBS));
static MODIFIER_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(MODIFIERS));
static TITLE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(PERSON_TITLES));
static GIVEN_NAME_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(GIVEN_NAMES));
static PLACE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| to_set(PLACES));

/// Longest multi-word entry across the place and title lists.
const MAX_PHRASE_WORDS: usize = 4;

pub fn is_article(word: &str) -> bool {
    ARTICLE_SET.contains(word.to_lowercase().as_str())
}

pub fn is_preposition(word: &str) -> bool {
    PREPOSITION_SET.contains(word.to_lowercase().as_str())
}

pub fn is_conjunction(word: &str) -> bool {
    CONJUNCTION_SET.contains(word.to_lowercase().as_str())
}

/// Articles, prepositions, conjunctions, pronouns, determiners, auxiliaries.
pub fn is_stop_word(word: &str) -> bool {
    let w = word.to_lowercase();
    ARTICLE_SET.contains(w.as_str())
        || PREPOSITION_SET.contains(w.as_str())
        || CONJUNCTION_SET.contains(w.as_str())
        || FUNCTION_SET.contains(w.as_str())
}

pub fn is_known_verb(word: &str) -> bool {
    VERB_SET.contains(word.to_lowercase().as_str())
}

pub fn is_modifier(word: &str) -> bool {
    MODIFIER_SET.contains(word.to_lowercase().as_str())
}

pub fn is_given_name(word: &str) -> bool {
    GIVEN_NAME_SET.contains(word.to_lowercase().as_str())
}

fn phrase_len_at(words: &[&str], start: usize, set: &HashSet<&'static str>) -> Option<usize> {
    let max = MAX_PHRASE_WORDS.min(words.len().saturating_sub(start));
    (1..=max).rev().find(|&n| {
        let phrase = words[start..start + n].join(" ").to_lowercase();
        set.contains(phrase.as_str())
    })
}

/// Number of words of the longest place name starting at `start`.
pub fn longest_place_at(words: &[&str], start: usize) -> Option<usize> {
    phrase_len_at(words, start, &PLACE_SET)
}

/// Number of words of the longest person title starting at `start`.
pub fn title_run_at(words: &[&str], start: usize) -> Option<usize> {
    phrase_len_at(words, start, &TITLE_SET)
}
