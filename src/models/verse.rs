//! Scripture verse catalog shown on the home page.

use rand::Rng;
use serde::Serialize;

/// A verse with its book/chapter reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Verse {
    pub text: &'static str,
    pub reference: &'static str,
}

const fn verse(text: &'static str, reference: &'static str) -> Verse {
    Verse { text, reference }
}

/// Fixed catalog (Louis Segond).
pub static VERSES: [Verse; 15] = [
    verse("Car Dieu a tant aimé le monde qu'il a donné son Fils unique, afin que quiconque croit en lui ne périsse point, mais qu'il ait la vie éternelle.", "Jean 3:16"),
    verse("L'Éternel est mon berger: je ne manquerai de rien.", "Psaume 23:1"),
    verse("Je puis tout par celui qui me fortifie.", "Philippiens 4:13"),
    verse("Ne crains point, car je suis avec toi; Ne t'effraie point, car je suis ton Dieu.", "Ésaïe 41:10"),
    verse("Venez à moi, vous tous qui êtes fatigués et chargés, et je vous donnerai du repos.", "Matthieu 11:28"),
    verse("Confie-toi en l'Éternel de tout ton cœur, Et ne t'appuie pas sur ta sagesse.", "Proverbes 3:5"),
    verse("L'Éternel est ma lumière et mon salut: De qui aurais-je crainte?", "Psaume 27:1"),
    verse("Et nous savons que toutes choses concourent au bien de ceux qui aiment Dieu.", "Romains 8:28"),
    verse("Mais ceux qui se confient en l'Éternel renouvellent leur force.", "Ésaïe 40:31"),
    verse("Car je connais les projets que j'ai formés sur vous, dit l'Éternel, projets de paix et non de malheur.", "Jérémie 29:11"),
    verse("En toutes choses rendez grâces; car c'est à votre égard la volonté de Dieu en Jésus-Christ.", "1 Thessaloniciens 5:18"),
    verse("Soyez forts et courageux. N'ayez pas peur et ne soyez pas effrayés devant eux.", "Deutéronome 31:6"),
    verse("Ta parole est une lampe à mes pieds, Et une lumière sur mon sentier.", "Psaume 119:105"),
    verse("L'amour est patient, il est plein de bonté; l'amour n'est point envieux.", "1 Corinthiens 13:4"),
    verse("Cherchez premièrement le royaume et la justice de Dieu; et toutes ces choses vous seront données par-dessus.", "Matthieu 6:33"),
];

/// Draw one verse uniformly from `catalog`.
///
/// Returns `None` only for an empty catalog.
pub fn pick_verse<R: Rng + ?Sized>(catalog: &[Verse], rng: &mut R) -> Option<Verse> {
    if catalog.is_empty() {
        return None;
    }
    catalog.get(rng.random_range(0..catalog.len())).copied()
}

/// Draw one verse from the built-in catalog using the thread-local generator.
pub fn random_verse() -> Verse {
    match pick_verse(&VERSES, &mut rand::rng()) {
        Some(verse) => verse,
        None => VERSES[0],
    }
}
