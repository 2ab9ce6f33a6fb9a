// Canonical brand keywords per country, plus hand-maintained aliases.
//
// Only canonical spellings reach the CSV outputs. Variants are generated from
// them (see `Catalog::variants_map`) and used for querying and matching.

pub(super) fn canonical_raw(code: &str) -> &'static [&'static str] {
    match code {
        "ar" => AR,
        "br" => BR,
        "pl" => PL,
        _ => &[],
    }
}

pub(super) fn extra_aliases(code: &str) -> &'static [(&'static str, &'static [&'static str])] {
    match code {
        "br" => BR_ALIASES,
        "pl" => PL_ALIASES,
        _ => &[],
    }
}

const AR: &[&str] = &[
    "Betano", "Bet365", "Codere", "Betsson", "bplay", "BetWarrior", "Jugadón", "City Center Online",
    "Casino Magic Online", "Casino Club Online", "Casino Buenos Aires Online", "Palermo Online",
    "Casino del Río Online", "Casino Santa Fe Online", "Casino de Mendoza Online",
    "Casino de Córdoba Online", "Casino de Victoria Online", "Casino de Entre Ríos Online",
    "Casino de Misiones Online", "Casino de Tucumán Online", "Casino de Neuquén Online",
    "Casino de Río Negro Online", "Casino de San Luis Online", "Casino de San Juan Online",
    "Casino de Salta Online", "Casino de Chaco Online", "Casino de Corrientes Online",
    "Casino de La Pampa Online", "Casino de Formosa Online", "Betcris", "Rivalo", "Betway",
    "Betfair", "Pinnacle", "Marathonbet", "1xBet", "1win", "22Bet", "20Bet", "TonyBet", "LeoVegas",
    "Unibet", "William Hill", "Betfred", "Bwin", "888sport", "888casino", "Bodog", "Stake",
    "BC.GAME", "N1 Bet", "Mostbet", "Melbet", "Parimatch", "10bet", "BetVictor", "Campeonbet",
    "Librabet", "Rabona", "Powbet", "FezBet", "BetTilt", "Megapari", "Betobet", "GG.BET", "Pin-Up",
    "PlayUZU", "Vulkan Vegas", "SlotV", "Bizzo", "Neon54", "7Signs", "HellSpin", "Tsars", "1xSlots",
    "Wazamba", "BoaBoa", "ZetCasino", "Casumo", "NetBet", "LV BET", "Novibet", "Betmotion",
    "Spin Casino", "Spinamba", "Mr Green", "Royal Panda", "Karamba", "Bet-at-home", "Interwetten",
    "BetAmerica", "TwinSpires", "Tipico", "ComeOn", "Bethard", "BetUK", "Grosvenor Casino", "Coral",
    "Ladbrokes", "Paddy Power", "SBK", "PokerStars Sports", "PokerStars Casino", "PartyCasino",
    "PartyPoker", "BetMGM", "Caesars Sportsbook", "DraftKings", "FanDuel", "Sky Bet", "SugarHouse",
    "888poker", "GGPoker", "WPT Global", "Winamax", "Coolbet", "Betsson Group (StarCasino)",
    "StarCasino", "JackpotCity", "Royal Vegas", "Spin Sports", "EnergyCasino", "Mr.Play",
    "Platin Casino", "Playamo", "Casimba", "CasiGo", "PlayOJO", "Genesis Casino", "Kassu", "Spinit",
    "Kroon Casino", "Betano Casino", "Bet365 Casino", "Betway Casino", "Codere Casino",
    "Betsson Casino", "bplay Casino", "Casino Club", "Casino Buenos Aires",
    "Hipódromo Argentino de Palermo", "City Center Rosario", "Casino Victoria",
    "Casino Magic Neuquén", "Casino Puerto Madero", "Casino Trilenium", "Casino Tigre",
    "Casino Pinamar", "Casino Bariloche", "Casino Cipolletti", "Casino Maipú", "Casino Godoy Cruz",
    "Casino Central Mar del Plata", "Casino Miramar", "Casino Santa Rosa", "Casino Resistencia",
    "Casino Posadas", "Casino Iguazú", "Casino Salta", "Casino Termas de Río Hondo",
    "Casino Catamarca", "Casino Ushuaia", "Casino Río Grande", "Casino Mendoza Online",
    "Boldt Gaming", "Atlántica de Juegos", "Alea (Lotería)",
    "Lotería de la Ciudad (BA CABA Online)", "Lotería de la Provincia (Buenos Aires)",
    "BPlay Santa Fe", "BPlay Entre Ríos", "BPlay Buenos Aires", "Betpoint", "Betnacional (LATAM)",
    "Retabet", "Suertia", "KirolBet", "Codeta", "Betboro", "Dafabet", "12Bet", "10CRIC", "22Win",
    "1Bet", "Stake Originals", "Thunderpick", "Roobet", "Sportsbet.io", "Cloudbet", "FortuneJack",
    "mBit Casino", "Bitcasino.io", "BetFury", "Rollbit", "BC.Game Casino", "Rubet", "Blaze",
    "Betano Argentina", "Betway Argentina", "Codere Argentina", "Betsson Argentina",
    "bplay Argentina", "BetWarrior Argentina", "Jugadón Argentina", "City Center Online Argentina",
];

const BR: &[&str] = &[
    // mainstream
    "Betano", "bet365", "Sportingbet", "PixBet", "Betnacional", "Superbet", "Betfair", "Galera.bet",
    "EstrelaBet", "KTO", "Brazino777", "BetMGM", "Bet7k", "Vaidebet", "BetPix365",
    "Esportes da Sorte", "Casa de Apostas", "Rivalo", "Pinnacle", "Betway", "Betboo", "Novibet",
    "Bodog", "Betmotion", "Dafabet", "Bettilt", "Betwinner", "22Bet", "Parimatch", "LeoVegas",
    "Betsafe", "PokerStars", "Marathonbet", "BetVictor", "888casino", "TonyBet", "Betfred",
    "betwarrior",
    // licensed / niche / local
    "BR4Bet", "Alfa.bet", "VersusBet", "BetCopa", "Aposta Ganha", "ApostaMax", "Aposta1",
    "AviaoBet", "Bateu Bet", "MultiBet", "RicoBet", "BRXBet", "PIN", "StartBet", "Luck.bet", "Bet4",
    "FYBet", "TivoBet", "BetFast", "Bravo", "Tradicional", "JonBet", "Bet Gorillas", "Bet Buffalos",
    "Bet Falcons", "Reals", "BRBet", "B1 Bet", "Apostou", "OleyBet", "OnaBet", "BetPark", "BetBoom",
    "Matchbook", "BetEspecial", "Bolsa de Aposta", "FulliBet", "BetBra", "ArenaPlus", "BingoPlus",
    "SeguroBet", "7Games", "King Panda", "GingaBet", "QGBet", "VivaSorte", "AFUN", "Sortenabet",
    "Betou", "Betfusion", "Sorte Online", "LottoLand", "Tiger", "PQ777", "5G", "BetEsporte",
    "Lance de Sorte", "SupremaBet", "MaximaBet", "UltraBet", "Bet Sul", "Jogo Online", "SeuBet",
    "H2 Bet", "4Win", "4Play", "Pagol", "Aposta10", "Aposte Fácil", "Aposta Certa", "Apostou Legal",
    "NossaBet", "PlayBets", "ReiBet", "NextBet", "MrJackBet", "F12Bet", "PagBet", "VaiBet",
    "KakáBet", "NacionalBet", "BetMais", "SambaBet", "RioBet", "BrasilBet", "CariocaBet",
    "MineiroBet", "GauchoBet", "NordesteBet", "AmazôniaBet", "PantanalBet", "LigaBet", "ArenaBet",
    "TorcidaBet", "CartolaBet", "EsportivaBet", "Apostou BR", "Bet Prime", "PrimeBet", "TopBet",
    "Ultra Aposta", "JetBet", "FlashBet", "TurboBet", "HyperBet", "TopPix", "PixWin", "PixLuck",
    "PixAposta", "PixSport", "PixPlay", "PixGol", "PixScore", "PixChance", "PixMaster", "PixPrime",
    // fantasy
    "Rei do Pitaco", "Cartola FC", "Matchday", "Sorare",
    // iGaming / casino
    "BacanaPlay", "PlayUzu", "WJCasino", "Cassino", "Fogo777", "IJogo", "P9", "9F", "6R", "Bet.app",
    "Bingo", "Big", "Caesars", "Betsson", "Blaze", "Stake", "Pin-Up", "1win", "1xBet", "Mostbet",
    "Melbet", "Betano Casino", "KTO Casino", "Betway Casino", "LeoVegas Casino", "PixBet Casino",
    "EstrelaBet Casino",
];

const PL: &[&str] = &[
    // active bookmakers
    "Superbet", "Betclic", "STS", "Fortuna", "Betfan", "LV BET", "forBET", "TOTALbet", "eWinner",
    "ETOTO", "PZBuk", "Fuksiarz", "Betcris", "Betters", "GO+bet", "AdmiralBet", "Lebull", "ComeOn",
    "Traf",
    // local / historical
    "Noblebet", "BetX", "Totolotek",
    // state casinos and lotteries
    "Total Casino", "Casinos Poland", "Hit Casino", "LOTTO", "Totalizator Sportowy",
];

const BR_ALIASES: &[(&str, &[&str])] = &[
    ("Galera.bet", &["GaleraBet", "galera.bet", "galerabet"]),
    ("Casa de Apostas", &["CasadeApostas", "casa de apostas", "casadeapostas"]),
    ("Esportes da Sorte", &["esportes da sorte", "Esporte365", "Esporte 365"]),
    ("LV BET", &["LVBET", "lvbet", "LVBet"]),
    ("GO+bet", &["GO BET", "GoBet", "gobet", "GO+BET", "go+bet"]),
];

const PL_ALIASES: &[(&str, &[&str])] = &[
    ("LV BET", &["LVBET", "lvbet", "LVBet"]),
    ("GO+bet", &["GO BET", "GoBet", "gobet", "GO+BET", "go+bet"]),
    ("Total Casino", &["TotalCasino", "totalcasino"]),
    ("Casinos Poland", &["Casino Poland", "casinospoland"]),
    ("Hit Casino", &["HitCasino", "hitcasino"]),
    ("LOTTO", &["lotto"]),
];
