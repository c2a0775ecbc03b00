//! Named colors: the X11 set and a selection of Pantone solid-coated swatches.
//!
//! Lookups are case-insensitive and ignore spaces, hyphens and underscores,
//! so `"Steel Blue"`, `"steel-blue"` and `"steelblue"` are the same color.
//! Pantone names are looked up with their `pantone` prefix
//! (`"Pantone 186 C"`).

use super::Color;

const X11: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF),
    ("antiquewhite", 0xFAEBD7),
    ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4),
    ("azure", 0xF0FFFF),
    ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4),
    ("black", 0x000000),
    ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF),
    ("blueviolet", 0x8A2BE2),
    ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887),
    ("cadetblue", 0x5F9EA0),
    ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E),
    ("coral", 0xFF7F50),
    ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkcyan", 0x008B8B),
    ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkkhaki", 0xBDB76B),
    ("darkmagenta", 0x8B008B),
    ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00),
    ("darkorchid", 0x9932CC),
    ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A),
    ("darkseagreen", 0x8FBC8F),
    ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F),
    ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493),
    ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969),
    ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222),
    ("floralwhite", 0xFFFAF0),
    ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF),
    ("gainsboro", 0xDCDCDC),
    ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520),
    ("gray", 0xBEBEBE),
    ("green", 0x00FF00),
    ("greenyellow", 0xADFF2F),
    ("honeydew", 0xF0FFF0),
    ("hotpink", 0xFF69B4),
    ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0),
    ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5),
    ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD),
    ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF),
    ("lightgoldenrodyellow", 0xFAFAD2),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A),
    ("lightseagreen", 0x20B2AA),
    ("lightskyblue", 0x87CEFA),
    ("lightslategray", 0x778899),
    ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0),
    ("lime", 0x00FF00),
    ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6),
    ("magenta", 0xFF00FF),
    ("maroon", 0xB03060),
    ("mediumaquamarine", 0x66CDAA),
    ("mediumblue", 0x0000CD),
    ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB),
    ("mediumseagreen", 0x3CB371),
    ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A),
    ("mediumturquoise", 0x48D1CC),
    ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xF5FFFA),
    ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD),
    ("navy", 0x000080),
    ("oldlace", 0xFDF5E6),
    ("olive", 0x808000),
    ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA),
    ("palegreen", 0x98FB98),
    ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5),
    ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F),
    ("pink", 0xFFC0CB),
    ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6),
    ("purple", 0xA020F0),
    ("rebeccapurple", 0x663399),
    ("red", 0xFF0000),
    ("rosybrown", 0xBC8F8F),
    ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513),
    ("salmon", 0xFA8072),
    ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57),
    ("seashell", 0xFFF5EE),
    ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090),
    ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F),
    ("steelblue", 0x4682B4),
    ("tan", 0xD2B48C),
    ("teal", 0x008080),
    ("thistle", 0xD8BFD8),
    ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0),
    ("violet", 0xEE82EE),
    ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF),
    ("whitesmoke", 0xF5F5F5),
    ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];

const PANTONE: &[(&str, u32)] = &[
    ("pantoneyellowc", 0xFEDD00),
    ("pantoneorange021c", 0xFE5000),
    ("pantonewarmredc", 0xF9423A),
    ("pantonered032c", 0xEF3340),
    ("pantonerubineredc", 0xCE0058),
    ("pantonerhodaminered", 0xE10098),
    ("pantonepurplec", 0xBB29BB),
    ("pantoneviolet", 0x440099),
    ("pantonebluec", 0x0018A8),
    ("pantonereflexbluec", 0x001489),
    ("pantoneprocessbluec", 0x0085CA),
    ("pantonegreenc", 0x00AB84),
    ("pantoneblackc", 0x2D2926),
    ("pantone100c", 0xF6EB61),
    ("pantone109c", 0xFFD100),
    ("pantone123c", 0xFFC72C),
    ("pantone151c", 0xFF8200),
    ("pantone165c", 0xFF6720),
    ("pantone185c", 0xE4002B),
    ("pantone186c", 0xC8102E),
    ("pantone199c", 0xD50032),
    ("pantone201c", 0x9D2235),
    ("pantone219c", 0xDA1884),
    ("pantone2685c", 0x330072),
    ("pantone272c", 0x7474C1),
    ("pantone281c", 0x00205B),
    ("pantone286c", 0x0033A0),
    ("pantone293c", 0x003DA5),
    ("pantone300c", 0x005EB8),
    ("pantone3005c", 0x0077C8),
    ("pantone306c", 0x00B5E2),
    ("pantone320c", 0x009CA6),
    ("pantone334c", 0x009775),
    ("pantone347c", 0x009A44),
    ("pantone354c", 0x00B140),
    ("pantone361c", 0x43B02A),
    ("pantone375c", 0x97D700),
    ("pantone382c", 0xC4D600),
    ("pantone405c", 0x6A6259),
    ("pantone425c", 0x54585A),
    ("pantone432c", 0x333F48),
    ("pantone446c", 0x3F4444),
    ("pantone485c", 0xDA291C),
    ("pantone520c", 0x512A44),
    ("pantone533c", 0x1F2A44),
    ("pantone5395c", 0x081F2C),
    ("pantone7427c", 0x97233F),
    ("pantone7548c", 0xFFC600),
    ("pantonecoolgray1c", 0xD9D9D6),
    ("pantonecoolgray5c", 0xB1B3B3),
    ("pantonecoolgray9c", 0x75787B),
    ("pantonecoolgray11c", 0x53565A),
    ("pantonewarmgray1c", 0xD7D2CB),
    ("pantonewarmgray7c", 0x968C83),
    ("pantonewarmgray11c", 0x6E6259),
];

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn from_u32(v: u32) -> Color {
    Color::rgb8((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Look up an X11 or Pantone color by name.
pub fn lookup(name: &str) -> Option<Color> {
    let key = normalize(name);
    let table = if key.starts_with("pantone") { PANTONE } else { X11 };
    table
        .iter()
        .find(|(n, _)| *n == key)
        .map(|&(_, v)| from_u32(v))
}

/// Names of every X11 color, in alphabetical order.
pub fn x11_names() -> impl Iterator<Item = &'static str> {
    X11.iter().map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_forgiving() {
        assert_eq!(lookup("Steel Blue"), lookup("steelblue"));
        assert_eq!(lookup("STEEL_BLUE").unwrap().to_hex(), "#4682b4");
        assert_eq!(lookup("white"), Some(Color::WHITE));
    }

    #[test]
    fn pantone_swatches() {
        assert_eq!(lookup("Pantone 186 C").unwrap().to_hex(), "#c8102e");
        assert_eq!(lookup("pantone cool gray 9 c").unwrap().to_hex(), "#75787b");
        assert!(lookup("pantone 9999 c").is_none());
    }

    #[test]
    fn x11_table_is_sorted_and_unique() {
        let names: Vec<_> = x11_names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
}
