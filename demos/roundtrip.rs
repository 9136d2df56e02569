use std::time::Instant;

use sgff::{load_mapped, Container, Header, HistoryNode, Payload, Sequence, SequenceFlags, SequenceTag};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration
    let num_bases = 10_000_000;
    let num_nodes = 32;
    let filename = "test_roundtrip.dna";

    println!("SGFF Roundtrip Test");
    println!("===================");
    println!("Bases: {}", num_bases);
    println!("History nodes: {}\n", num_nodes);

    let symbols: String = (0..num_bases).map(|i| b"GATC"[i % 4] as char).collect();
    let mut flags = SequenceFlags::default();
    flags.set_circular(true);
    flags.set_double_stranded(true);

    let mut container = Container::new(Header::new(1, 16, 16));
    container.set_sequence(0, Sequence::with_flags(symbols.clone(), flags))?;
    container.append(6, Payload::Text("<Notes><Type>Synthetic</Type></Notes>".into()));
    container.append(7, Payload::CompressedText("<HistoryTree/>".into()));
    for index in 0..num_nodes {
        let node = HistoryNode::plain(index, SequenceTag::Dna, &symbols[..1000 + index as usize]);
        container.push_history_node(node);
    }

    // ========== WRITE TEST ==========
    println!("Writing...");
    let write_start = Instant::now();
    container.to_path(filename)?;
    let write_duration = write_start.elapsed();
    let size = std::fs::metadata(filename)?.len();
    println!("  ✓ Write complete");
    println!("  Duration: {:.2}s", write_duration.as_secs_f64());
    println!("  Size: {:.2} MB\n", size as f64 / 1_000_000.0);

    // ========== STREAMING READ TEST ==========
    println!("Reading (streaming)...");
    let read_start = Instant::now();
    let parsed = Container::from_path(filename)?;
    println!("  ✓ Read complete");
    println!("  Duration: {:.2}s\n", read_start.elapsed().as_secs_f64());

    // ========== MAPPED READ TEST ==========
    println!("Reading (mapped)...");
    let mapped_start = Instant::now();
    let mapped = load_mapped(filename)?;
    println!("  ✓ Read complete");
    println!("  Duration: {:.2}s\n", mapped_start.elapsed().as_secs_f64());

    // ========== VERIFICATION ==========
    println!("Verifying...");
    assert_eq!(parsed, container);
    assert_eq!(mapped, container);
    assert_eq!(parsed.sequence().map(|s| s.len()), Some(num_bases));
    assert_eq!(parsed.history().nodes.len(), num_nodes as usize);
    println!("  ✓ All blocks match");

    std::fs::remove_file(filename)?;
    Ok(())
}
