use cube_core::{Face, FaceLetters, Stickers};
use owo_colors::OwoColorize;

/// Background colors of a standard scheme
fn rgb(face: Face) -> (u8, u8, u8) {
    match face {
        Face::Right => (196, 30, 58),
        Face::Up => (255, 255, 255),
        Face::Front => (0, 158, 96),
        Face::Left => (255, 88, 0),
        Face::Down => (255, 213, 0),
        Face::Back => (0, 81, 186),
    }
}

fn cell(out: &mut String, sticker: Face, letters: &FaceLetters, color: bool) {
    let letter = letters.letter(sticker);
    if color {
        let (r, g, b) = rgb(sticker);
        out.push_str(&format!("{letter} ").black().on_truecolor(r, g, b).to_string());
    } else {
        out.push(letter);
        out.push(' ');
    }
}

/// Renders the stickers as an unfolded cross with the up face above the
/// front face and the left, front, right and back faces side by side.
pub fn render(stickers: &Stickers, letters: &FaceLetters, color: bool) -> String {
    let n = stickers.layer_count();
    let indent = " ".repeat(2 * n);
    let mut out = String::new();

    let row = |out: &mut String, faces: &[Face], r: usize, pad: bool| {
        let mut line = String::new();
        if pad {
            line.push_str(&indent);
        }
        for &face in faces {
            for &sticker in &stickers.face(face)[r * n..(r + 1) * n] {
                cell(&mut line, sticker, letters, color);
            }
        }
        out.push_str(line.trim_end_matches(' '));
        out.push('\n');
    };

    for r in 0..n {
        row(&mut out, &[Face::Up], r, true);
    }
    for r in 0..n {
        row(
            &mut out,
            &[Face::Left, Face::Front, Face::Right, Face::Back],
            r,
            false,
        );
    }
    for r in 0..n {
        row(&mut out, &[Face::Down], r, true);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_pocket_net() {
        let net = render(&Stickers::solved(2), &FaceLetters::default(), false);
        assert_eq!(
            net,
            "    U U\n\
             \x20   U U\n\
             L L F F R R B B\n\
             L L F F R R B B\n\
             \x20   D D\n\
             \x20   D D\n"
        );
    }

    #[test]
    fn colored_net_keeps_the_letters() {
        let net = render(&Stickers::solved(3), &FaceLetters::default(), true);
        assert_eq!(net.lines().count(), 9);
        for letter in ['R', 'U', 'F', 'L', 'D', 'B'] {
            assert_eq!(net.matches(letter).count(), 9);
        }
        assert!(net.contains("\x1b["));
    }
}
