//! Currencies published by NBP and the tables that carry them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// NBP rate table.
///
/// Tables `A` and `B` publish mid rates only. Table `C` publishes bid/ask
/// quotes for a handful of major currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Table {
    A,
    B,
    C,
}

impl Table {
    /// Path segment used by the API.
    pub fn as_path(&self) -> &'static str {
        match self {
            Table::A => "a",
            Table::B => "b",
            Table::C => "c",
        }
    }

    pub fn is_bid_ask(&self) -> bool {
        matches!(self, Table::C)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Table::A => "A",
            Table::B => "B",
            Table::C => "C",
        };
        f.write_str(name)
    }
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub tables: BTreeSet<Table>,
}

impl Currency {
    pub fn new(code: &str, name: &str, tables: &[Table]) -> Self {
        Self {
            code: code.to_uppercase(),
            name: name.to_string(),
            tables: tables.iter().copied().collect(),
        }
    }

    /// The mid-rate table (`A` or `B`) publishing this currency.
    pub fn mid_table(&self) -> Option<Table> {
        self.tables.iter().copied().find(|t| !t.is_bid_ask())
    }

    pub fn has_bid_ask(&self) -> bool {
        self.tables.contains(&Table::C)
    }
}

/// Read-only lookup from currency code to registry entry.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    currencies: BTreeMap<String, Currency>,
}

static NBP_REGISTRY: LazyLock<Arc<CurrencyRegistry>> =
    LazyLock::new(|| Arc::new(CurrencyRegistry::from_currencies(nbp_currencies())));

impl CurrencyRegistry {
    /// Registry of every currency published by NBP, shared process-wide.
    pub fn nbp() -> Arc<CurrencyRegistry> {
        Arc::clone(&NBP_REGISTRY)
    }

    pub fn from_currencies<I>(currencies: I) -> Self
    where
        I: IntoIterator<Item = Currency>,
    {
        Self {
            currencies: currencies
                .into_iter()
                .filter(|c| c.mid_table().is_some())
                .map(|c| (c.code.clone(), c))
                .collect(),
        }
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, code: &str) -> Option<&Currency> {
        self.currencies.get(&code.trim().to_uppercase())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    pub fn mid_table(&self, code: &str) -> Option<Table> {
        self.lookup(code).and_then(Currency::mid_table)
    }

    pub fn has_bid_ask(&self, code: &str) -> bool {
        self.lookup(code).is_some_and(Currency::has_bid_ask)
    }

    /// Entries ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

fn nbp_currencies() -> Vec<Currency> {
    use Table::{A, B, C};

    const TABLE_A: &[(&str, &str)] = &[
        ("THB", "bat (Tajlandia)"),
        ("USD", "dolar amerykański"),
        ("AUD", "dolar australijski"),
        ("HKD", "dolar Hongkongu"),
        ("CAD", "dolar kanadyjski"),
        ("NZD", "dolar nowozelandzki"),
        ("SGD", "dolar singapurski"),
        ("EUR", "euro"),
        ("HUF", "forint (Węgry)"),
        ("CHF", "frank szwajcarski"),
        ("GBP", "funt szterling"),
        ("UAH", "hrywna (Ukraina)"),
        ("JPY", "jen (Japonia)"),
        ("CZK", "korona czeska"),
        ("DKK", "korona duńska"),
        ("ISK", "korona islandzka"),
        ("NOK", "korona norweska"),
        ("SEK", "korona szwedzka"),
        ("HRK", "kuna (Chorwacja)"),
        ("RON", "lej rumuński"),
        ("BGN", "lew (Bułgaria)"),
        ("TRY", "lira turecka"),
        ("ILS", "nowy izraelski szekel"),
        ("CLP", "peso chilijskie"),
        ("PHP", "peso filipińskie"),
        ("MXN", "peso meksykańskie"),
        ("ZAR", "rand (Republika Południowej Afryki)"),
        ("BRL", "real (Brazylia)"),
        ("MYR", "ringgit (Malezja)"),
        ("RUB", "rubel rosyjski"),
        ("IDR", "rupia indonezyjska"),
        ("INR", "rupia indyjska"),
        ("KRW", "won południowokoreański"),
        ("CNY", "yuan renminbi (Chiny)"),
        ("XDR", "SDR (MFW)"),
    ];

    const TABLE_B: &[(&str, &str)] = &[
        ("AFN", "afgani (Afganistan)"),
        ("MGA", "ariary (Madagaskar)"),
        ("PAB", "balboa (Panama)"),
        ("ETB", "birr etiopski"),
        ("VES", "boliwar soberano (Wenezuela)"),
        ("BOB", "boliwiano (Boliwia)"),
        ("CRC", "colon kostarykański"),
        ("SVC", "colon salwadorski"),
        ("NIO", "cordoba oro (Nikaragua)"),
        ("GMD", "dalasi (Gambia)"),
        ("MKD", "denar (Macedonia Północna)"),
        ("DZD", "dinar algierski"),
        ("BHD", "dinar bahrajski"),
        ("IQD", "dinar iracki"),
        ("JOD", "dinar jordański"),
        ("KWD", "dinar kuwejcki"),
        ("LYD", "dinar libijski"),
        ("RSD", "dinar serbski"),
        ("TND", "dinar tunezyjski"),
        ("MAD", "dirham marokański"),
        ("AED", "dirham ZEA (Zjednoczone Emiraty Arabskie)"),
        ("STN", "dobra (Wyspy Świętego Tomasza i Książęca)"),
        ("BSD", "dolar bahamski"),
        ("BBD", "dolar barbadoski"),
        ("BZD", "dolar belizeński"),
        ("BND", "dolar brunejski"),
        ("FJD", "dolar Fidżi"),
        ("GYD", "dolar gujański"),
        ("JMD", "dolar jamajski"),
        ("LRD", "dolar liberyjski"),
        ("NAD", "dolar namibijski"),
        ("SRD", "dolar surinamski"),
        ("TTD", "dolar Trynidadu i Tobago"),
        ("XCD", "dolar wschodniokaraibski"),
        ("SBD", "dolar Wysp Salomona"),
        ("ZWL", "dolar Zimbabwe"),
        ("VND", "dong (Wietnam)"),
        ("AMD", "dram (Armenia)"),
        ("CVE", "escudo Zielonego Przylądka"),
        ("AWG", "florin arubański"),
        ("BIF", "frank burundyjski"),
        ("XOF", "frank CFA BCEAO"),
        ("XAF", "frank CFA BEAC"),
        ("XPF", "frank CFP"),
        ("DJF", "frank Dżibuti"),
        ("GNF", "frank gwinejski"),
        ("KMF", "frank Komorów"),
        ("CDF", "frank kongijski"),
        ("RWF", "frank rwandyjski"),
        ("EGP", "funt egipski"),
        ("GIP", "funt gibraltarski"),
        ("LBP", "funt libański"),
        ("SSP", "funt południowosudański"),
        ("SDG", "funt sudański"),
        ("SYP", "funt syryjski"),
        ("GHS", "Ghana cedi"),
        ("HTG", "gourde (Haiti)"),
        ("PYG", "guarani (Paragwaj)"),
        ("ANG", "gulden Antyli Holenderskich"),
        ("PGK", "kina (Papua-Nowa Gwinea)"),
        ("LAK", "kip (Laos)"),
        ("MWK", "kwacha malawijska"),
        ("ZMW", "kwacha zambijska"),
        ("AOA", "kwanza (Angola)"),
        ("MMK", "kyat (Myanmar, Birma)"),
        ("GEL", "lari (Gruzja)"),
        ("MDL", "lej Mołdawii"),
        ("ALL", "lek (Albania)"),
        ("HNL", "lempira (Honduras)"),
        ("SLL", "leone (Sierra Leone)"),
        ("SZL", "lilangeni (Eswatini)"),
        ("LSL", "loti (Lesotho)"),
        ("AZN", "manat azerbejdżański"),
        ("MZN", "metical (Mozambik)"),
        ("NGN", "naira (Nigeria)"),
        ("ERN", "nakfa (Erytrea)"),
        ("TWD", "nowy dolar tajwański"),
        ("TMT", "nowy manat turkmeński"),
        ("MRU", "ouguiya (Mauretania)"),
        ("TOP", "pa'anga (Tonga)"),
        ("MOP", "pataca (Makau)"),
        ("ARS", "peso argentyńskie"),
        ("DOP", "peso dominikańskie"),
        ("COP", "peso kolumbijskie"),
        ("CUP", "peso kubańskie"),
        ("UYU", "peso urugwajskie"),
        ("BWP", "pula (Botswana)"),
        ("GTQ", "quetzal (Gwatemala)"),
        ("IRR", "rial irański"),
        ("YER", "rial jemeński"),
        ("QAR", "rial katarski"),
        ("OMR", "rial omański"),
        ("SAR", "rial saudyjski"),
        ("KHR", "riel (Kambodża)"),
        ("BYN", "rubel białoruski"),
        ("LKR", "rupia lankijska"),
        ("MVR", "rupia (Malediwy)"),
        ("MUR", "rupia Mauritiusu"),
        ("NPR", "rupia nepalska"),
        ("PKR", "rupia pakistańska"),
        ("SCR", "rupia seszelska"),
        ("PEN", "sol (Peru)"),
        ("KGS", "som (Kirgistan)"),
        ("TJS", "somoni (Tadżykistan)"),
        ("UZS", "sum (Uzbekistan)"),
        ("KES", "szyling kenijski"),
        ("SOS", "szyling somalijski"),
        ("TZS", "szyling tanzański"),
        ("UGX", "szyling ugandyjski"),
        ("BDT", "taka (Bangladesz)"),
        ("WST", "tala (Samoa)"),
        ("KZT", "tenge (Kazachstan)"),
        ("MNT", "tugrik (Mongolia)"),
        ("VUV", "vatu (Vanuatu)"),
        ("BAM", "wymienialna marka (Bośnia i Hercegowina)"),
    ];

    // Currencies also quoted with bid/ask in table C.
    const TABLE_C: &[&str] = &[
        "USD", "AUD", "CAD", "EUR", "HUF", "CHF", "GBP", "JPY", "CZK", "DKK", "NOK", "SEK", "XDR",
    ];

    let table_a = TABLE_A.iter().map(|(code, name)| {
        if TABLE_C.contains(code) {
            Currency::new(code, name, &[A, C])
        } else {
            Currency::new(code, name, &[A])
        }
    });
    let table_b = TABLE_B
        .iter()
        .map(|(code, name)| Currency::new(code, name, &[B]));

    table_a.chain(table_b).collect()
}
