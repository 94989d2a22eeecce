use rs_chat_core::model::dictionary::Dictionary;
use rs_chat_core::model::generator::Generator;
use rs_chat_core::model::graph::WordGraph;
use rs_chat_core::model::word::WordRole;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load the lexicon shipped with the workspace
    // A .bin cache is written next to the .csv for fast reloads
    let dictionary = Dictionary::new("./data/lexicon.csv")?;

    // Every record lands in the group of its role, in file order
    for role in WordRole::ALL {
        println!("{}: {} words", role, dictionary.group(role).len());
    }

    // Build the transition graph once; after this only frequencies move
    let mut chat = Generator::new(WordGraph::build(&dictionary));

    // One full exchange per prompt: boost, generate, reset
    for prompt in [
        "I like pizza",
        "the cat runs",        // "the" + known subject prefixes the reply
        "what about Saturn?",  // no vocabulary match, start is a prompt-hash pick
    ] {
        println!("> {}", prompt);
        println!("< {}", chat.respond(prompt));
    }

    // The three calls behind respond() can also be driven separately,
    // as long as they keep the boost -> generate -> reset order
    let use_article_prefix = chat.boost_words_from_prompt("the dog sleeps");
    println!("article prefix detected: {}", use_article_prefix);
    println!("< {}", chat.generate_most_likely_sentence("the dog sleeps", use_article_prefix));
    chat.reset_all_boosts();

    // A lexicon that cannot be read is a fatal error, not a degraded start
    match Generator::from_lexicon("./data/missing.csv") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Load rejected: {}", e),
    }

    // With no subjects at all, generation degrades to a fixed phrase
    let mut empty = Generator::new(WordGraph::build(&Dictionary::default()));
    println!("< {}", empty.respond("hello"));

    Ok(())
}
