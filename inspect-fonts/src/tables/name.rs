//! The [Naming (name)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table.

use std::fmt;

use sfnt_types::{Offset16, ReadScalar, ValueType};

use crate::error::ReadError;
use crate::font_data::Cursor;
use crate::parser::{NamesMap, Parser};

pub(crate) const WINDOWS_UNICODE_BMP_ENCODING_ID: u16 = 1;

/// A platform id as used by `name` and `cmap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlatformId {
    Unicode,
    Macintosh,
    Iso,
    Windows,
    Custom,
}

impl ReadScalar for PlatformId {
    const RAW_BYTE_LEN: usize = 2;
    const VALUE_TYPE: ValueType = ValueType::Platform;

    fn read_be(data: &[u8]) -> Option<Self> {
        Some(match u16::read_be(data)? {
            0 => PlatformId::Unicode,
            1 => PlatformId::Macintosh,
            2 => PlatformId::Iso,
            3 => PlatformId::Windows,
            _ => PlatformId::Custom,
        })
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlatformId::Unicode => "Unicode",
            PlatformId::Macintosh => "Macintosh",
            PlatformId::Iso => "ISO",
            PlatformId::Windows => "Windows",
            PlatformId::Custom => "Custom",
        })
    }
}

fn unicode_encoding_name(id: u16) -> &'static str {
    match id {
        0 => "Unicode 1.0",
        1 => "Unicode 1.1",
        2 => "ISO/IEC 10646",
        3 => "Unicode 2.0 BMP",
        4 => "Unicode 2.0 full repertoire",
        5 => "Unicode Variation Sequences",
        6 => "Unicode full repertoire",
        _ => "Unknown",
    }
}

fn win_encoding_name(id: u16) -> &'static str {
    match id {
        0 => "Symbol",
        1 => "Unicode BMP",
        2 => "ShiftJIS",
        3 => "PRC",
        4 => "Big5",
        5 => "Wansung",
        6 => "Johab",
        7..=9 => "Reserved",
        10 => "Unicode full repertoire",
        _ => "Unknown",
    }
}

static MAC_ENCODING_NAMES: &[&str] = &[
    "Roman",
    "Japanese",
    "Chinese (Traditional)",
    "Korean",
    "Arabic",
    "Hebrew",
    "Greek",
    "Russian",
    "RSymbol",
    "Devanagari",
    "Gurmukhi",
    "Gujarati",
    "Oriya",
    "Bengali",
    "Tamil",
    "Telugu",
    "Kannada",
    "Malayalam",
    "Sinhalese",
    "Burmese",
    "Khmer",
    "Thai",
    "Laotian",
    "Georgian",
    "Armenian",
    "Chinese (Simplified)",
    "Tibetan",
    "Mongolian",
    "Geez",
    "Slavic",
    "Vietnamese",
    "Sindhi",
    "Uninterpreted",
];

fn iso_encoding_name(id: u16) -> &'static str {
    match id {
        0 => "7-bit ASCII",
        1 => "ISO 10646",
        2 => "ISO 8859-1",
        _ => "Unknown",
    }
}

pub(crate) fn encoding_name(platform: PlatformId, id: u16) -> String {
    match platform {
        PlatformId::Unicode => unicode_encoding_name(id).to_string(),
        PlatformId::Macintosh => MAC_ENCODING_NAMES
            .get(id as usize)
            .copied()
            .unwrap_or("Unknown")
            .to_string(),
        PlatformId::Iso => iso_encoding_name(id).to_string(),
        PlatformId::Windows => win_encoding_name(id).to_string(),
        PlatformId::Custom => id.to_string(),
    }
}

// https://docs.microsoft.com/en-us/typography/opentype/spec/name#windows-language-ids
fn win_language_name(id: u16) -> &'static str {
    match id {
        0x0436 => "Afrikaans, South Africa",
        0x041C => "Albanian, Albania",
        0x0484 => "Alsatian, France",
        0x045E => "Amharic, Ethiopia",
        0x1401 => "Arabic, Algeria",
        0x3C01 => "Arabic, Bahrain",
        0x0C01 => "Arabic, Egypt",
        0x0801 => "Arabic, Iraq",
        0x2C01 => "Arabic, Jordan",
        0x3401 => "Arabic, Kuwait",
        0x3001 => "Arabic, Lebanon",
        0x1001 => "Arabic, Libya",
        0x1801 => "Arabic, Morocco",
        0x2001 => "Arabic, Oman",
        0x4001 => "Arabic, Qatar",
        0x0401 => "Arabic, Saudi Arabia",
        0x2801 => "Arabic, Syria",
        0x1C01 => "Arabic, Tunisia",
        0x3801 => "Arabic, U.A.E.",
        0x2401 => "Arabic, Yemen",
        0x042B => "Armenian, Armenia",
        0x044D => "Assamese, India",
        0x082C => "Azeri (Cyrillic), Azerbaijan",
        0x042C => "Azeri (Latin), Azerbaijan",
        0x046D => "Bashkir, Russia",
        0x042D => "Basque, Basque",
        0x0423 => "Belarusian, Belarus",
        0x0845 => "Bengali, Bangladesh",
        0x0445 => "Bengali, India",
        0x201A => "Bosnian (Cyrillic), Bosnia and Herzegovina",
        0x141A => "Bosnian (Latin), Bosnia and Herzegovina",
        0x047E => "Breton, France",
        0x0402 => "Bulgarian, Bulgaria",
        0x0403 => "Catalan, Catalan",
        0x0C04 => "Chinese, Hong Kong S.A.R.",
        0x1404 => "Chinese, Macao S.A.R.",
        0x0804 => "Chinese, People's Republic of China",
        0x1004 => "Chinese, Singapore",
        0x0404 => "Chinese, Taiwan",
        0x0483 => "Corsican, France",
        0x041A => "Croatian, Croatia",
        0x101A => "Croatian (Latin), Bosnia and Herzegovina",
        0x0405 => "Czech, Czech Republic",
        0x0406 => "Danish, Denmark",
        0x048C => "Dari, Afghanistan",
        0x0465 => "Divehi, Maldives",
        0x0813 => "Dutch, Belgium",
        0x0413 => "Dutch, Netherlands",
        0x0C09 => "English, Australia",
        0x2809 => "English, Belize",
        0x1009 => "English, Canada",
        0x2409 => "English, Caribbean",
        0x4009 => "English, India",
        0x1809 => "English, Ireland",
        0x2009 => "English, Jamaica",
        0x4409 => "English, Malaysia",
        0x1409 => "English, New Zealand",
        0x3409 => "English, Republic of the Philippines",
        0x4809 => "English, Singapore",
        0x1C09 => "English, South Africa",
        0x2C09 => "English, Trinidad and Tobago",
        0x0809 => "English, United Kingdom",
        0x0409 => "English, United States",
        0x3009 => "English, Zimbabwe",
        0x0425 => "Estonian, Estonia",
        0x0438 => "Faroese, Faroe Islands",
        0x0464 => "Filipino, Philippines",
        0x040B => "Finnish, Finland",
        0x080C => "French, Belgium",
        0x0C0C => "French, Canada",
        0x040C => "French, France",
        0x140C => "French, Luxembourg",
        0x180C => "French, Principality of Monaco",
        0x100C => "French, Switzerland",
        0x0462 => "Frisian, Netherlands",
        0x0456 => "Galician, Galician",
        0x0437 => "Georgian, Georgia",
        0x0C07 => "German, Austria",
        0x0407 => "German, Germany",
        0x1407 => "German, Liechtenstein",
        0x1007 => "German, Luxembourg",
        0x0807 => "German, Switzerland",
        0x0408 => "Greek, Greece",
        0x046F => "Greenlandic, Greenland",
        0x0447 => "Gujarati, India",
        0x0468 => "Hausa (Latin), Nigeria",
        0x040D => "Hebrew, Israel",
        0x0439 => "Hindi, India",
        0x040E => "Hungarian, Hungary",
        0x040F => "Icelandic, Iceland",
        0x0470 => "Igbo, Nigeria",
        0x0421 => "Indonesian, Indonesia",
        0x045D => "Inuktitut, Canada",
        0x085D => "Inuktitut (Latin), Canada",
        0x083C => "Irish, Ireland",
        0x0434 => "isiXhosa, South Africa",
        0x0435 => "isiZulu, South Africa",
        0x0410 => "Italian, Italy",
        0x0810 => "Italian, Switzerland",
        0x0411 => "Japanese, Japan",
        0x044B => "Kannada, India",
        0x043F => "Kazakh, Kazakhstan",
        0x0453 => "Khmer, Cambodia",
        0x0486 => "K'iche, Guatemala",
        0x0487 => "Kinyarwanda, Rwanda",
        0x0441 => "Kiswahili, Kenya",
        0x0457 => "Konkani, India",
        0x0412 => "Korean, Korea",
        0x0440 => "Kyrgyz, Kyrgyzstan",
        0x0454 => "Lao, Lao P.D.R.",
        0x0426 => "Latvian, Latvia",
        0x0427 => "Lithuanian, Lithuania",
        0x082E => "Lower, Sorbian Germany",
        0x046E => "Luxembourgish, Luxembourg",
        0x042F => "Macedonian (FYROM), Former Yugoslav Republic of Macedonia",
        0x083E => "Malay, Brunei Darussalam",
        0x043E => "Malay, Malaysia",
        0x044C => "Malayalam, India",
        0x043A => "Maltese, Malta",
        0x0481 => "Maori, New Zealand",
        0x047A => "Mapudungun, Chile",
        0x044E => "Marathi, India",
        0x047C => "Mohawk, Mohawk",
        0x0450 => "Mongolian (Cyrillic), Mongolia",
        0x0850 => "Mongolian (Traditional), People's Republic of China",
        0x0461 => "Nepali, Nepal",
        0x0414 => "Norwegian (Bokmal), Norway",
        0x0814 => "Norwegian (Nynorsk), Norway",
        0x0482 => "Occitan, France",
        0x0448 => "Odia (formerly Oriya), India",
        0x0463 => "Pashto, Afghanistan",
        0x0415 => "Polish, Poland",
        0x0416 => "Portuguese, Brazil",
        0x0816 => "Portuguese, Portugal",
        0x0446 => "Punjabi, India",
        0x046B => "Quechua, Bolivia",
        0x086B => "Quechua, Ecuador",
        0x0C6B => "Quechua, Peru",
        0x0418 => "Romanian, Romania",
        0x0417 => "Romansh, Switzerland",
        0x0419 => "Russian, Russia",
        0x243B => "Sami (Inari), Finland",
        0x103B => "Sami (Lule), Norway",
        0x143B => "Sami (Lule), Sweden",
        0x0C3B => "Sami (Northern), Finland",
        0x043B => "Sami (Northern), Norway",
        0x083B => "Sami (Northern), Sweden",
        0x203B => "Sami (Skolt), Finland",
        0x183B => "Sami (Southern), Norway",
        0x1C3B => "Sami (Southern), Sweden",
        0x044F => "Sanskrit, India",
        0x1C1A => "Serbian (Cyrillic), Bosnia and Herzegovina",
        0x0C1A => "Serbian (Cyrillic), Serbia",
        0x181A => "Serbian (Latin), Bosnia and Herzegovina",
        0x081A => "Serbian (Latin), Serbia",
        0x046C => "Sesotho sa Leboa, South Africa",
        0x0432 => "Setswana, South Africa",
        0x045B => "Sinhala, Sri Lanka",
        0x041B => "Slovak, Slovakia",
        0x0424 => "Slovenian, Slovenia",
        0x2C0A => "Spanish, Argentina",
        0x400A => "Spanish, Bolivia",
        0x340A => "Spanish, Chile",
        0x240A => "Spanish, Colombia",
        0x140A => "Spanish, Costa Rica",
        0x1C0A => "Spanish, Dominican Republic",
        0x300A => "Spanish, Ecuador",
        0x440A => "Spanish, El Salvador",
        0x100A => "Spanish, Guatemala",
        0x480A => "Spanish, Honduras",
        0x080A => "Spanish, Mexico",
        0x4C0A => "Spanish, Nicaragua",
        0x180A => "Spanish, Panama",
        0x3C0A => "Spanish, Paraguay",
        0x280A => "Spanish, Peru",
        0x500A => "Spanish, Puerto Rico",
        0x0C0A => "Spanish (Modern Sort), Spain",
        0x040A => "Spanish (Traditional Sort), Spain",
        0x540A => "Spanish, United States",
        0x380A => "Spanish, Uruguay",
        0x200A => "Spanish, Venezuela",
        0x081D => "Sweden, Finland",
        0x041D => "Swedish, Sweden",
        0x045A => "Syriac, Syria",
        0x0428 => "Tajik (Cyrillic), Tajikistan",
        0x085F => "Tamazight (Latin), Algeria",
        0x0449 => "Tamil, India",
        0x0444 => "Tatar, Russia",
        0x044A => "Telugu, India",
        0x041E => "Thai, Thailand",
        0x0451 => "Tibetan, PRC",
        0x041F => "Turkish, Turkey",
        0x0442 => "Turkmen, Turkmenistan",
        0x0480 => "Uighur, PRC",
        0x0422 => "Ukrainian, Ukraine",
        0x042E => "Upper, Sorbian Germany",
        0x0420 => "Urdu, Islamic Republic of Pakistan",
        0x0843 => "Uzbek (Cyrillic), Uzbekistan",
        0x0443 => "Uzbek (Latin), Uzbekistan",
        0x042A => "Vietnamese, Vietnam",
        0x0452 => "Welsh, United Kingdom",
        0x0488 => "Wolof, Senegal",
        0x0485 => "Yakut, Russia",
        0x0478 => "Yi, PRC",
        0x046A => "Yoruba, Nigeria",
        _ => "Unknown",
    }
}

fn mac_language_name(id: u16) -> &'static str {
    match id {
        0 => "English",
        1 => "French",
        2 => "German",
        3 => "Italian",
        4 => "Dutch",
        5 => "Swedish",
        6 => "Spanish",
        7 => "Danish",
        8 => "Portuguese",
        9 => "Norwegian",
        10 => "Hebrew",
        11 => "Japanese",
        12 => "Arabic",
        13 => "Finnish",
        14 => "Greek",
        15 => "Icelandic",
        16 => "Maltese",
        17 => "Turkish",
        18 => "Croatian",
        19 => "Chinese (Traditional)",
        20 => "Urdu",
        21 => "Hindi",
        22 => "Thai",
        23 => "Korean",
        24 => "Lithuanian",
        25 => "Polish",
        26 => "Hungarian",
        27 => "Estonian",
        28 => "Latvian",
        29 => "Sami",
        30 => "Faroese",
        31 => "Farsi/Persian",
        32 => "Russian",
        33 => "Chinese (Simplified)",
        34 => "Flemish",
        35 => "Irish Gaelic",
        36 => "Albanian",
        37 => "Romanian",
        38 => "Czech",
        39 => "Slovak",
        40 => "Slovenian",
        41 => "Yiddish",
        42 => "Serbian",
        43 => "Macedonian",
        44 => "Bulgarian",
        45 => "Ukrainian",
        46 => "Byelorussian",
        47 => "Uzbek",
        48 => "Kazakh",
        49 => "Azerbaijani (Cyrillic script)",
        50 => "Azerbaijani (Arabic script)",
        51 => "Armenian",
        52 => "Georgian",
        53 => "Moldavian",
        54 => "Kirghiz",
        55 => "Tajiki",
        56 => "Turkmen",
        57 => "Mongolian (Mongolian script)",
        58 => "Mongolian (Cyrillic script)",
        59 => "Pashto",
        60 => "Kurdish",
        61 => "Kashmiri",
        62 => "Sindhi",
        63 => "Tibetan",
        64 => "Nepali",
        65 => "Sanskrit",
        66 => "Marathi",
        67 => "Bengali",
        68 => "Assamese",
        69 => "Gujarati",
        70 => "Punjabi",
        71 => "Oriya",
        72 => "Malayalam",
        73 => "Kannada",
        74 => "Tamil",
        75 => "Telugu",
        76 => "Sinhalese",
        77 => "Burmese",
        78 => "Khmer",
        79 => "Lao",
        80 => "Vietnamese",
        81 => "Indonesian",
        82 => "Tagalog",
        83 => "Malay (Roman script)",
        84 => "Malay (Arabic script)",
        85 => "Amharic",
        86 => "Tigrinya",
        87 => "Galla",
        88 => "Somali",
        89 => "Swahili",
        90 => "Kinyarwanda/Ruanda",
        91 => "Rundi",
        92 => "Nyanja/Chewa",
        93 => "Malagasy",
        94 => "Esperanto",
        // 95-127 - reserved
        128 => "Welsh",
        129 => "Basque",
        130 => "Catalan",
        131 => "Latin",
        132 => "Quechua",
        133 => "Guarani",
        134 => "Aymara",
        135 => "Tatar",
        136 => "Uighur",
        137 => "Dzongkha",
        138 => "Javanese (Roman script)",
        139 => "Sundanese (Roman script)",
        140 => "Galician",
        141 => "Afrikaans",
        142 => "Breton",
        143 => "Inuktitut",
        144 => "Scottish Gaelic",
        145 => "Manx Gaelic",
        146 => "Irish Gaelic (with dot above)",
        147 => "Tongan",
        148 => "Greek (polytonic)",
        149 => "Greenlandic",
        150 => "Azerbaijani (Roman script)",
        _ => "Unknown",
    }
}

pub(crate) fn language_name(platform: PlatformId, id: u16) -> String {
    match platform {
        PlatformId::Macintosh => mac_language_name(id).to_string(),
        PlatformId::Windows => win_language_name(id).to_string(),
        _ => id.to_string(),
    }
}

static RECORD_NAMES: &[&str] = &[
    "Copyright notice",
    "Family",
    "Subfamily",
    "Unique ID",
    "Full name",
    "Version",
    "PostScript",
    "Trademark",
    "Manufacturer",
    "Designer",
    "Description",
    "URL Vendor",
    "URL Designer",
    "License Description",
    "License Info URL",
    "Reserved",
    "Typographic Family",
    "Typographic Subfamily",
    "Compatible Full",
    "Sample text",
    "PostScript CID",
    "WWS Family",
    "WWS Subfamily",
    "Light Background Palette",
    "Dark Background Palette",
    "Variations PostScript Prefix",
];

/// A lookup table for the upper half of the Mac OS Roman encoding; the
/// values 128..=255 map to these code points. The lower half is ASCII.
#[rustfmt::skip]
static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];

/// Decode one Mac OS Roman byte.
pub(crate) fn mac_roman_char(byte: u8) -> char {
    if byte < 128 {
        byte as char
    } else {
        // Every entry in the table is a valid code point.
        char::from_u32(u32::from(MAC_ROMAN_DECODE[byte as usize - 128])).unwrap_or('\u{FFFD}')
    }
}

#[derive(Clone, Copy)]
struct NameRecord {
    platform_id: PlatformId,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    offset: usize,
    length: usize,
}

impl NameRecord {
    fn is_unicode(&self) -> bool {
        self.platform_id == PlatformId::Unicode
            || (self.platform_id == PlatformId::Windows
                && self.encoding_id == WINDOWS_UNICODE_BMP_ENCODING_ID)
    }

    fn title(&self) -> String {
        let encoding = encoding_name(self.platform_id, self.encoding_id);
        let language = language_name(self.platform_id, self.language_id);
        match RECORD_NAMES.get(self.name_id as usize) {
            Some(name) => format!("{name} ({encoding}, {language})"),
            None => format!("Record {} ({encoding}, {language})", self.name_id),
        }
    }
}

pub(crate) fn parse(p: &mut Parser) -> Result<(), ReadError> {
    let table_start = p.offset();

    let format = p.read::<u16>("Format")?;
    let count = p.read::<u16>("Number of records")?;
    let storage_offset = p.read::<Offset16>("Offset to string storage")?;

    let mut records = Vec::new();
    p.read_array_with("Name Records", count as usize, |p, n| {
        p.begin_group_nth(n);
        let platform_id = p.read::<PlatformId>("Platform ID")?;
        let encoding_id = p.peek::<u16>()?;
        p.read_with_value::<u16>("Encoding ID", encoding_name(platform_id, encoding_id))?;
        let language_id = p.peek::<u16>()?;
        p.read_with_value::<u16>("Language ID", language_name(platform_id, language_id))?;
        let name_id = p.read::<u16>("Name ID")?;
        let length = p.read::<u16>("String length")?;
        let offset = p.read::<Offset16>("String offset")?;
        p.end_group();

        if length != 0 {
            records.push(NameRecord {
                platform_id,
                encoding_id,
                language_id,
                name_id,
                offset: offset.to_usize(),
                length: length as usize,
            });
        }
        Ok(())
    })?;

    if format == 1 {
        let lang_count = p.read::<u16>("Number of language-tag records")?;
        p.read_array_with("Language-tag Records", lang_count as usize, |p, n| {
            p.begin_group_nth(n);
            p.read::<u16>("String length")?;
            p.read::<Offset16>("String offset")?;
            p.end_group();
            Ok(())
        })?;
    }

    // Multiple records may share an offset; parse each range once.
    records.sort_by_key(|record| record.offset);
    records.dedup_by_key(|record| record.offset);
    drop_overlapping(&mut records);

    p.read_array_with("Names", records.len(), |p, n| {
        let record = records[n as usize];
        p.advance_to(table_start + storage_offset.to_usize() + record.offset)?;
        let title = record.title();
        if record.is_unicode() {
            p.read_utf16_string(title, record.length)?;
        } else if record.platform_id == PlatformId::Macintosh {
            p.read_mac_roman_string(title, record.length)?;
        } else {
            p.read_unsupported(record.length)?;
        }
        Ok(())
    })
}

/// Remove records whose storage range overlaps an earlier record.
fn drop_overlapping(records: &mut Vec<NameRecord>) {
    let mut kept: Vec<NameRecord> = Vec::with_capacity(records.len());
    for record in records.iter() {
        let start = record.offset;
        let end = start + record.length;
        let overlaps = kept.iter().any(|prev| {
            let prev_end = prev.offset + prev.length;
            (start >= prev.offset && start < prev_end) || (end > prev.offset && end <= prev_end)
        });
        if !overlaps {
            kept.push(*record);
        }
    }
    *records = kept;
}

/// Walk the table without recording anything and return the English names,
/// keyed by name id. Used to label name ids in `fvar`, `STAT`, `feat` and
/// `trak`.
pub(crate) fn collect_names(mut cursor: Cursor) -> Result<NamesMap, ReadError> {
    cursor.read::<u16>()?; // format
    let count = cursor.read::<u16>()?;
    let storage_offset = cursor.read::<u16>()? as usize;

    let mut records = Vec::new();
    for _ in 0..count {
        let platform_id = cursor.read::<PlatformId>()?;
        let encoding_id = cursor.read::<u16>()?;
        let language_id = cursor.read::<u16>()?;
        let name_id = cursor.read::<u16>()?;
        let length = cursor.read::<u16>()? as usize;
        let offset = cursor.read::<u16>()? as usize;

        if length == 0 {
            continue;
        }
        records.push(NameRecord {
            platform_id,
            encoding_id,
            language_id,
            name_id,
            offset,
            length,
        });
    }

    let mut names = NamesMap::default();
    for record in records {
        cursor.jump_to(storage_offset + record.offset)?;
        if record.is_unicode() {
            names.insert(record.name_id, cursor.read_utf16_be(record.length)?);
        } else if record.platform_id == PlatformId::Macintosh && record.language_id == 0 {
            // English only.
            names.insert(record.name_id, cursor.read_mac_roman(record.length)?);
        }
    }

    Ok(names)
}
