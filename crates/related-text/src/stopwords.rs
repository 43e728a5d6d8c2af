use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use related_core::{Error, Result};

use crate::normalize::fold;

const EN: &[&str] = &[
	"a","about","above","after","again","against","all","am","an","and","any","are","as","at","be","because","been","before","being","below","between","both","but","by",
	"can","could","did","do","does","doing","down","during","each","few","for","from","further","had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
	"i","if","in","into","is","it","it's","its","itself","just","me","more","most","must","my","myself","no","nor","not","now","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
	"same","shall","she","should","so","some","such","than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
	"under","until","up","very","was","we","were","what","when","where","which","while","who","whom","whose","why","will","with","would","you","your","yours","yourself","yourselves",
];

const FR: &[&str] = &[
	"au","aux","avec","ce","ces","cet","cette","dans","de","des","du","elle","elles","en","est","et","eux","il","ils","je","la","le","les","leur","leurs","lui","ma","mais","me","mes","moi","mon",
	"ne","nos","notre","nous","on","ou","où","par","pas","pour","qu","que","qui","sa","se","ses","son","sont","sur","ta","te","tes","toi","ton","tu","un","une","vos","votre","vous","été","être","avoir","a","à",
];

const ES: &[&str] = &[
	"a","al","algo","como","con","de","del","desde","donde","el","ella","ellas","ellos","en","entre","era","es","esta","este","esto","fue","ha","hay","la","las","le","les","lo","los","más","me","mi",
	"muy","no","nos","o","para","pero","por","que","se","si","sin","sobre","su","sus","también","te","tu","un","una","uno","unos","y","ya","yo","él",
];

const DE: &[&str] = &[
	"aber","als","am","an","auch","auf","aus","bei","bin","bis","da","das","dass","dem","den","der","des","die","doch","du","ein","eine","einem","einen","einer","eines","er","es","für","hat","ich",
	"ihr","im","in","ist","ja","kann","mit","nach","nicht","noch","nur","oder","sein","sich","sie","sind","so","über","um","und","uns","von","vor","war","was","wie","wir","wird","zu","zum","zur",
];

/// Stopword dictionaries keyed by ISO 639-1 code.
///
/// Lookups use the primary subtag of a hint (`en-GB` reads the `en` list).
/// An unknown hint has no list, which means no stopword removal.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
	lists: HashMap<String, HashSet<String>>,
}

impl Stopwords {
	/// No lists at all; every hint degrades to no removal.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn builtin() -> Self {
		let mut stopwords = Self::default();
		for (lang, words) in [("en", EN), ("fr", FR), ("es", ES), ("de", DE)] {
			stopwords.insert(lang, words.iter().copied());
		}
		stopwords
	}

	/// Replaces the list for `lang`.
	pub fn insert<I, S>(&mut self, lang: &str, words: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let set = words.into_iter().map(|w| fold(w.as_ref().trim())).filter(|w| !w.is_empty()).collect();
		self.lists.insert(primary_subtag(lang), set);
	}

	/// Loads every `<lang>.txt` file of `dir`, one word per line, `#` starts a comment.
	/// A file replaces any list already held for its language.
	pub fn load_dir(mut self, dir: &Path) -> Result<Self> {
		let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
		for entry in entries {
			let path = entry.map_err(|e| Error::io(dir, e))?.path();
			if path.extension().and_then(|s| s.to_str()) != Some("txt") {
				continue;
			}
			let Some(lang) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else { continue };
			let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
			let words = content.lines().map(|l| l.split('#').next().unwrap_or("")).filter(|l| !l.trim().is_empty());
			self.insert(&lang, words);
			tracing::debug!(lang = %lang, path = %path.display(), "loaded stopword list");
		}
		Ok(self)
	}

	pub fn for_lang(&self, hint: &str) -> Option<&HashSet<String>> {
		self.lists.get(&primary_subtag(hint))
	}

	pub fn languages(&self) -> Vec<&str> {
		let mut langs: Vec<&str> = self.lists.keys().map(String::as_str).collect();
		langs.sort_unstable();
		langs
	}
}

/// `en-US`, `en_us` and `EN` all become `en`.
pub fn primary_subtag(hint: &str) -> String {
	hint.trim().split(['-', '_']).next().unwrap_or("").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn subtags() {
		assert_eq!(primary_subtag("en-US"), "en");
		assert_eq!(primary_subtag("pt_BR"), "pt");
		assert_eq!(primary_subtag(" FR "), "fr");
		assert_eq!(primary_subtag(""), "");
	}

	#[test]
	fn builtin_lists_are_folded() {
		let sw = Stopwords::builtin();
		assert!(sw.for_lang("en").unwrap().contains("the"));
		assert!(sw.for_lang("de-AT").unwrap().contains("über"));
		assert!(sw.for_lang("generic").is_none());
		assert_eq!(sw.languages(), vec!["de", "en", "es", "fr"]);
	}
}
