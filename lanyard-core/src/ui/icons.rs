//! Built-in 16x16 icons
//!
//! Icons are written as ASCII art (`#` is ink) and packed at compile time.
//! Screens draw them scaled.

use crate::canvas::Bitmap;

/// Pack sixteen rows of ASCII art into a 16x16 bitmap
const fn art16(rows: [&str; 16]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut y = 0;
    while y < 16 {
        let row = rows[y].as_bytes();
        let mut x = 0;
        while x < 16 && x < row.len() {
            if row[x] == b'#' {
                out[y * 2 + x / 8] |= 0x80 >> (x % 8);
            }
            x += 1;
        }
        y += 1;
    }
    out
}

static LOGO_BITS: [u8; 32] = art16([
    "################",
    "#              #",
    "# ##        ## #",
    "# ###      ### #",
    "# ####    #### #",
    "# ## ##  ## ## #",
    "# ##  ####  ## #",
    "# ##   ##   ## #",
    "# ##        ## #",
    "# ##        ## #",
    "# ##        ## #",
    "# ##        ## #",
    "# ##        ## #",
    "#              #",
    "################",
    "                ",
]);

static MIC_BITS: [u8; 32] = art16([
    "      ####      ",
    "     ######     ",
    "     ######     ",
    "     ######     ",
    "     ######     ",
    "     ######     ",
    "     ######     ",
    "  #  ######  #  ",
    "  #   ####   #  ",
    "  ##        ##  ",
    "   ##      ##   ",
    "    ########    ",
    "       ##       ",
    "       ##       ",
    "    ########    ",
    "                ",
]);

static MIC_OFF_BITS: [u8; 32] = art16([
    "#     ####      ",
    " #   ######     ",
    "  #  ######     ",
    "   #  #####     ",
    "    #  ####     ",
    "     #  ###     ",
    "     ##  ##     ",
    "  #  ###  #  #  ",
    "  #   ###  # #  ",
    "  ##        ##  ",
    "   ##      # #  ",
    "    ########  # ",
    "       ##      #",
    "       ##       ",
    "    ########    ",
    "                ",
]);

static LINK_BITS: [u8; 32] = art16([
    "                ",
    "      ####      ",
    "     #    #     ",
    "     #    #     ",
    "     #    #     ",
    "     #  # #     ",
    "     #  # #     ",
    "      # ##      ",
    "      ## #      ",
    "     # #  #     ",
    "     # #  #     ",
    "     #    #     ",
    "     #    #     ",
    "     #    #     ",
    "      ####      ",
    "                ",
]);

static UNLINK_BITS: [u8; 32] = art16([
    "                ",
    "      ####      ",
    "     #    #     ",
    "     #    #     ",
    "     #    #     ",
    "     #  # #     ",
    "      ## #      ",
    "  ##            ",
    "            ##  ",
    "      # ##      ",
    "     # #  #     ",
    "     #    #     ",
    "     #    #     ",
    "     #    #     ",
    "      ####      ",
    "                ",
]);

static PAIR_BITS: [u8; 32] = art16([
    "                ",
    "   ###    ###   ",
    "  #####  #####  ",
    "  #####  #####  ",
    "  #####  #####  ",
    "   ###    ###   ",
    "                ",
    " #######  ######",
    "######### ######",
    "################",
    "################",
    "################",
    "################",
    "                ",
    "                ",
    "                ",
]);

static CHECK_BITS: [u8; 32] = art16([
    "                ",
    "              ##",
    "             ###",
    "            ### ",
    "           ###  ",
    "          ###   ",
    "##       ###    ",
    "###     ###     ",
    " ###   ###      ",
    "  ### ###       ",
    "   #####        ",
    "    ###         ",
    "     #          ",
    "                ",
    "                ",
    "                ",
]);

static CROSS_BITS: [u8; 32] = art16([
    "##            ##",
    "###          ###",
    " ###        ### ",
    "  ###      ###  ",
    "   ###    ###   ",
    "    ###  ###    ",
    "     ######     ",
    "      ####      ",
    "      ####      ",
    "     ######     ",
    "    ###  ###    ",
    "   ###    ###   ",
    "  ###      ###  ",
    " ###        ### ",
    "###          ###",
    "##            ##",
]);

static WIFI_BITS: [u8; 32] = art16([
    "                ",
    "    ########    ",
    "  ############  ",
    "###          ###",
    "##            ##",
    "     ######     ",
    "   ##########   ",
    "  ##        ##  ",
    "                ",
    "      ####      ",
    "     ######     ",
    "                ",
    "       ##       ",
    "       ##       ",
    "       ##       ",
    "                ",
]);

static NO_WIFI_BITS: [u8; 32] = art16([
    "##              ",
    " ## ########    ",
    "  ############  ",
    "#####        ###",
    "##  ##        ##",
    "     ######     ",
    "   ##########   ",
    "  ##   ##   ##  ",
    "        ##      ",
    "      #####     ",
    "     #######    ",
    "           ##   ",
    "       ##   ##  ",
    "       ##    ## ",
    "       ##     ##",
    "               #",
]);

/// Scale for icons placed over the physical buttons
pub const BUTTON_SCALE: u8 = 4;

pub static LOGO: Bitmap<'static> = Bitmap::new(16, 16, &LOGO_BITS).scaled(8);
pub static PAIR: Bitmap<'static> = Bitmap::new(16, 16, &PAIR_BITS).scaled(8);
pub static WIFI: Bitmap<'static> = Bitmap::new(16, 16, &WIFI_BITS).scaled(12);
pub static NO_WIFI: Bitmap<'static> = Bitmap::new(16, 16, &NO_WIFI_BITS).scaled(12);

pub static UNMUTE: Bitmap<'static> = Bitmap::new(16, 16, &MIC_BITS).scaled(BUTTON_SCALE);
pub static MUTE: Bitmap<'static> = Bitmap::new(16, 16, &MIC_OFF_BITS).scaled(BUTTON_SCALE);
pub static LINK: Bitmap<'static> = Bitmap::new(16, 16, &LINK_BITS).scaled(BUTTON_SCALE);
pub static UNLINK: Bitmap<'static> = Bitmap::new(16, 16, &UNLINK_BITS).scaled(BUTTON_SCALE);
pub static CHECK: Bitmap<'static> = Bitmap::new(16, 16, &CHECK_BITS).scaled(BUTTON_SCALE);
pub static CROSS: Bitmap<'static> = Bitmap::new(16, 16, &CROSS_BITS).scaled(BUTTON_SCALE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_art_packing() {
        let bits = art16([
            "#              #",
            " #", "", "", "", "", "", "", "", "", "", "", "", "", "",
            "        #",
        ]);
        assert_eq!(&bits[..4], &[0x80, 0x01, 0x40, 0x00]);
        assert_eq!(&bits[30..], &[0x00, 0x80]);
    }

    #[test]
    fn test_button_icons_fit_strip() {
        for icon in [UNMUTE, MUTE, LINK, UNLINK, CHECK, CROSS] {
            assert_eq!(icon.display_size(), (64, 64));
        }
    }
}
