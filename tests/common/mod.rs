//! Shared helpers: an in-memory ISO9660 image builder

#![allow(dead_code)]

use isoextract::{IsoFileSystem, SectorReader};
use std::io::Cursor;

pub const SECTOR: usize = 2048;
const FLAG_DIRECTORY: u8 = 0x02;
const FIRST_FREE_SECTOR: u32 = 18; // 16=PVD, 17=Terminator

enum Node {
    File(Vec<u8>),
    Dir(Vec<(String, Node)>),
}

struct Placed {
    name: String,
    extent: u32,
    size: u32,
    kind: PlacedKind,
}

enum PlacedKind {
    File(Vec<u8>),
    Dir(Vec<Placed>),
}

/// Builds small ISO9660 images with nested directories
pub struct IsoBuilder {
    volume_id: String,
    root: Vec<(String, Node)>,
}

impl IsoBuilder {
    pub fn new() -> Self {
        Self {
            volume_id: "TEST_VOLUME".to_string(),
            root: Vec::new(),
        }
    }

    pub fn volume_id(mut self, id: &str) -> Self {
        self.volume_id = id.to_string();
        self
    }

    /// Add a file; intermediate directories are created as needed.
    /// The last path component is stored verbatim, so include any `;1` suffix.
    pub fn file(mut self, path: &str, content: &[u8]) -> Self {
        insert(&mut self.root, path, Node::File(content.to_vec()));
        self
    }

    /// Add an (empty) directory
    pub fn dir(mut self, path: &str) -> Self {
        insert(&mut self.root, path, Node::Dir(Vec::new()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut next = FIRST_FREE_SECTOR;
        let root = place(String::new(), Node::Dir(self.root), &mut next);

        let mut data = vec![0u8; next as usize * SECTOR];

        // Primary Volume Descriptor
        let pvd = 16 * SECTOR;
        data[pvd] = 1;
        data[pvd + 1..pvd + 6].copy_from_slice(b"CD001");
        data[pvd + 6] = 1;
        data[pvd + 8..pvd + 40].fill(b' ');
        data[pvd + 40..pvd + 72].fill(b' ');
        let id = self.volume_id.as_bytes();
        data[pvd + 40..pvd + 40 + id.len()].copy_from_slice(id);
        write_both_endian_u32(&mut data[pvd + 80..], next);
        write_both_endian_u16(&mut data[pvd + 128..], SECTOR as u16);
        let root_record = record(&[0x00], FLAG_DIRECTORY, root.extent, root.size);
        data[pvd + 156..pvd + 156 + root_record.len()].copy_from_slice(&root_record);

        // Terminator
        let term = 17 * SECTOR;
        data[term] = 255;
        data[term + 1..term + 6].copy_from_slice(b"CD001");
        data[term + 6] = 1;

        write_dir(&mut data, &root, (root.extent, root.size));
        data
    }
}

fn insert(entries: &mut Vec<(String, Node)>, path: &str, node: Node) {
    match path.split_once('/') {
        None => entries.push((path.to_string(), node)),
        Some((head, rest)) => {
            let index = match entries.iter().position(|(n, _)| n == head) {
                Some(i) => i,
                None => {
                    entries.push((head.to_string(), Node::Dir(Vec::new())));
                    entries.len() - 1
                }
            };
            match &mut entries[index].1 {
                Node::Dir(children) => insert(children, rest, node),
                Node::File(_) => panic!("{} is a file", head),
            }
        }
    }
}

fn record_len(id_len: usize) -> usize {
    let len = 33 + id_len;
    len + len % 2
}

/// Records never straddle a sector boundary
fn dir_size(entries: &[(String, Node)]) -> u32 {
    let mut lengths = vec![record_len(1), record_len(1)];
    lengths.extend(entries.iter().map(|(name, _)| record_len(name.len())));

    let mut sectors = 1;
    let mut used = 0;
    for len in lengths {
        if used + len > SECTOR {
            sectors += 1;
            used = 0;
        }
        used += len;
    }
    (sectors * SECTOR) as u32
}

fn place(name: String, node: Node, next: &mut u32) -> Placed {
    match node {
        Node::File(content) => {
            let extent = *next;
            *next += content.len().div_ceil(SECTOR).max(1) as u32;
            Placed {
                name,
                extent,
                size: content.len() as u32,
                kind: PlacedKind::File(content),
            }
        }
        Node::Dir(entries) => {
            let size = dir_size(&entries);
            let extent = *next;
            *next += size / SECTOR as u32;
            let children = entries
                .into_iter()
                .map(|(n, c)| place(n, c, next))
                .collect();
            Placed {
                name,
                extent,
                size,
                kind: PlacedKind::Dir(children),
            }
        }
    }
}

fn write_dir(data: &mut [u8], dir: &Placed, parent: (u32, u32)) {
    let PlacedKind::Dir(children) = &dir.kind else {
        return;
    };

    let mut records = vec![
        record(&[0x00], FLAG_DIRECTORY, dir.extent, dir.size),
        record(&[0x01], FLAG_DIRECTORY, parent.0, parent.1),
    ];
    for child in children {
        let flags = match child.kind {
            PlacedKind::Dir(_) => FLAG_DIRECTORY,
            PlacedKind::File(_) => 0,
        };
        records.push(record(child.name.as_bytes(), flags, child.extent, child.size));
    }

    let mut pos = dir.extent as usize * SECTOR;
    for rec in records {
        if pos % SECTOR + rec.len() > SECTOR {
            pos = (pos / SECTOR + 1) * SECTOR;
        }
        data[pos..pos + rec.len()].copy_from_slice(&rec);
        pos += rec.len();
    }

    for child in children {
        match &child.kind {
            PlacedKind::File(content) => {
                let start = child.extent as usize * SECTOR;
                data[start..start + content.len()].copy_from_slice(content);
            }
            PlacedKind::Dir(_) => write_dir(data, child, (dir.extent, dir.size)),
        }
    }
}

pub fn record(identifier: &[u8], flags: u8, extent: u32, size: u32) -> Vec<u8> {
    let len = record_len(identifier.len());
    let mut rec = vec![0u8; len];
    rec[0] = len as u8;
    write_both_endian_u32(&mut rec[2..], extent);
    write_both_endian_u32(&mut rec[10..], size);
    rec[25] = flags;
    write_both_endian_u16(&mut rec[28..], 1);
    rec[32] = identifier.len() as u8;
    rec[33..33 + identifier.len()].copy_from_slice(identifier);
    rec
}

fn write_both_endian_u32(dst: &mut [u8], value: u32) {
    dst[0..4].copy_from_slice(&value.to_le_bytes());
    dst[4..8].copy_from_slice(&value.to_be_bytes());
}

fn write_both_endian_u16(dst: &mut [u8], value: u16) {
    dst[0..2].copy_from_slice(&value.to_le_bytes());
    dst[2..4].copy_from_slice(&value.to_be_bytes());
}

/// Byte offset of the directory record carrying `identifier`
pub fn find_record(image: &[u8], identifier: &[u8]) -> usize {
    let mut needle = vec![identifier.len() as u8];
    needle.extend_from_slice(identifier);
    let pos = image
        .windows(needle.len())
        .position(|w| w == needle.as_slice())
        .expect("record not found");
    pos - 32
}

/// Make the big-endian copy of a record's extent disagree with the little-endian one
pub fn corrupt_extent_endianness(image: &mut [u8], identifier: &[u8]) {
    let start = find_record(image, identifier);
    image[start + 6] ^= 0xFF;
}

/// Point a record's extent (consistently) somewhere past the end of the image
pub fn set_extent(image: &mut [u8], identifier: &[u8], extent: u32) {
    let start = find_record(image, identifier);
    write_both_endian_u32(&mut image[start + 2..], extent);
}

/// Overwrite a record's data length, keeping both endian copies in agreement
pub fn set_data_length(image: &mut [u8], identifier: &[u8], length: u32) {
    let start = find_record(image, identifier);
    write_both_endian_u32(&mut image[start + 10..], length);
}

pub fn mount(image: Vec<u8>) -> IsoFileSystem<Cursor<Vec<u8>>> {
    let reader = SectorReader::new(Cursor::new(image)).expect("Failed to create reader");
    IsoFileSystem::mount(reader).expect("Failed to mount image")
}
