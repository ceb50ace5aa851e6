//! End-to-end tests over fixture archives written to a temp directory.

use altopress::{AltoError, Archive, ArchiveFamily, FuzzMethod, MatchOptions};

const METS: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/"
           xmlns:mods="http://www.loc.gov/mods/v3"
           xmlns:xlink="http://www.w3.org/1999/xlink">
  <mets:dmdSec ID="dmd1">
    <mets:mdWrap><mets:xmlData><mods:mods>
      <mods:titleInfo><mods:title>The Dundee Courier</mods:title></mods:titleInfo>
      <mods:originInfo>
        <mods:publisher>W. Thomson</mods:publisher>
        <mods:place><mods:placeTerm>Dundee</mods:placeTerm></mods:place>
        <mods:dateIssued>1847 [1846, 47]</mods:dateIssued>
      </mods:originInfo>
      <mods:identifier>0000164</mods:identifier>
    </mods:mods></mets:xmlData></mets:mdWrap>
  </mets:dmdSec>
  <mets:structMap TYPE="PHYSICAL">
    <mets:div TYPE="issue">
      <mets:div ID="phys1" ORDER="1" TYPE="page">
        <mets:div ID="pa0001001" TYPE="body" CATEGORY="text">
          <mets:fptr><mets:area FILEID="img0001" SHAPE="RECT" COORDS="1220,5,2893,221"/></mets:fptr>
        </mets:div>
        <mets:div ID="pa0001003" TYPE="body" CATEGORY="text">
          <mets:fptr><mets:area FILEID="img0001" SHAPE="RECT" COORDS="2934,14,3709,211"/></mets:fptr>
        </mets:div>
      </mets:div>
      <mets:div ID="phys2" ORDER="2" TYPE="page">
        <mets:div ID="pa0002001" TYPE="body" CATEGORY="text">
          <mets:fptr><mets:area FILEID="img0002" SHAPE="RECT" COORDS="10,10,500,300"/></mets:fptr>
        </mets:div>
        <mets:div ID="pa0002002" TYPE="body" CATEGORY="illustration">
          <mets:fptr><mets:area FILEID="img0002" SHAPE="RECT" COORDS="600,10,900,300"/></mets:fptr>
        </mets:div>
      </mets:div>
    </mets:div>
  </mets:structMap>
  <mets:structMap TYPE="LOGICAL">
    <mets:div TYPE="newspaper">
      <mets:div ID="art0001" TYPE="ARTICLE"/>
      <mets:div ID="art0002" TYPE="ARTICLE"/>
      <mets:div ID="pi0001" TYPE="ARTICLE"/>
    </mets:div>
  </mets:structMap>
  <mets:structLink>
    <mets:smLinkGrp>
      <mets:smLocatorLink xlink:href="#art0001" xlink:label="article" xlink:type="locator"/>
      <mets:smLocatorLink xlink:href="#pa0001001" xlink:label="page1 area1" xlink:type="locator"/>
      <mets:smLocatorLink xlink:href="#pa0001003" xlink:label="page1 area3" xlink:type="locator"/>
    </mets:smLinkGrp>
    <mets:smLinkGrp>
      <mets:smLocatorLink xlink:href="#art0002" xlink:label="article" xlink:type="locator"/>
      <mets:smLocatorLink xlink:href="#pa0002001" xlink:label="page2 area1" xlink:type="locator"/>
    </mets:smLinkGrp>
  </mets:structLink>
</mets:mets>"##;

const ALTO_PAGE_1: &str = r#"<alto><Layout>
  <Page WIDTH="6000" HEIGHT="8000" PC="0.91">
    <TextBlock ID="pa0001001"><TextLine>
      <String CONTENT="The" HPOS="1220" VPOS="5" WIDTH="120" HEIGHT="60" WC="0.93"/>
      <String CONTENT="Parliament" HPOS="1360" VPOS="5" WIDTH="420" HEIGHT="60" WC="0.95"/>
      <String CONTENT="assembled" HPOS="1800" VPOS="5" WIDTH="400" HEIGHT="60"/>
    </TextLine></TextBlock>
    <TextBlock ID="pa0001003"><TextLine>
      <String CONTENT="yesterday" HPOS="2934" VPOS="14" WIDTH="300" HEIGHT="55" WC="0.88"/>
      <String CONTENT="afternoon" HPOS="3250" VPOS="14" WIDTH="310" HEIGHT="55" WC="0.82"/>
    </TextLine></TextBlock>
  </Page>
</Layout></alto>"#;

const ALTO_PAGE_2: &str = r#"<alto><Layout>
  <Page WIDTH="6000" HEIGHT="8000" PC="0.85">
    <TextBlock ID="pa0002001"><TextLine>
      <String CONTENT="Shipping" HPOS="10" VPOS="10" WIDTH="200" HEIGHT="50" WC="0.9"/>
      <String CONTENT="intelligence" HPOS="220" VPOS="10" WIDTH="260" HEIGHT="50" WC="0.8"/>
    </TextLine></TextBlock>
    <TextBlock ID="pa0002002"/>
  </Page>
</Layout></alto>"#;

const ALTO_EMPTY: &str =
    r#"<alto><Layout><Page WIDTH="1000" HEIGHT="2000" PC="0.5"/></Layout></alto>"#;

fn fixture_archive() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, content: &str| {
        std::fs::write(dir.path().join(name), content).unwrap();
    };
    write("0000164_18470101_mets.xml", METS);
    write("0000164_18470101_0001.xml", ALTO_PAGE_1);
    write("0000164_18470101_0002.xml", ALTO_PAGE_2);

    // A second document with page codes that only sort correctly under a
    // numeric key.
    write("0000164_18470102_mets.xml", METS);
    write("0000164_18470102_2.xml", ALTO_EMPTY);
    write("0000164_18470102_10.xml", ALTO_EMPTY);
    dir
}

#[test]
fn open_missing_path_is_source_not_found() {
    let err = Archive::open("/no/such/archive").unwrap_err();
    assert!(matches!(err, AltoError::SourceNotFound(_)));
}

#[test]
fn open_unmatched_listing_is_malformed_archive() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.txt"), "not an archive").unwrap();
    let err = Archive::open(dir.path()).unwrap_err();
    assert!(matches!(err, AltoError::MalformedArchive(_)));
}

#[test]
fn archive_enumerates_documents_in_listing_order() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    assert_eq!(archive.family().name(), "newspapers");
    assert_eq!(archive.document_count(), 2);
    assert_eq!(
        archive.document_codes().collect::<Vec<_>>(),
        vec!["0000164_18470101", "0000164_18470102"]
    );
}

#[test]
fn page_codes_sort_numerically() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    assert_eq!(
        archive.page_codes("0000164_18470102").unwrap(),
        vec!["2", "10"]
    );
}

#[test]
fn documents_iterator_is_restartable() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let first: Vec<String> = archive
        .documents()
        .map(|d| d.unwrap().code().to_string())
        .collect();
    let second: Vec<String> = archive
        .documents()
        .map(|d| d.unwrap().code().to_string())
        .collect();
    assert_eq!(first, second);
    assert_eq!(archive.documents().len(), 2);
}

#[test]
fn document_metadata_and_years() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();

    assert_eq!(document.title(), Some("The Dundee Courier"));
    assert_eq!(document.publisher(), Some("W. Thomson"));
    assert_eq!(document.place(), Some("Dundee"));
    assert_eq!(document.date(), Some("1847 [1846, 47]"));
    assert_eq!(document.identifier(), Some("0000164"));
    assert_eq!(document.document_type(), "newspaper");
    assert_eq!(document.years(), &[1846, 1847]);
    assert_eq!(document.year(), Some(1846));
    assert_eq!(document.page_count(), 2);
}

#[test]
fn document_without_date_or_place_has_no_years() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("0000164_18470101_mets.xml"),
        "<mets:mets xmlns:mets=\"http://www.loc.gov/METS/\"/>",
    )
    .unwrap();
    std::fs::write(dir.path().join("0000164_18470101_0001.xml"), ALTO_EMPTY).unwrap();

    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();
    assert_eq!(document.years(), &[] as &[i32]);
    assert_eq!(document.year(), None);
    assert_eq!(document.title(), None);
    assert_eq!(document.date(), None);
}

#[test]
fn article_ids_keep_only_article_prefixed_ids() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();
    // pi0001 is typed ARTICLE in the logical map but is not an article id.
    assert_eq!(document.article_ids(), &["art0001", "art0002"]);
}

#[test]
fn locators_and_article_id_lookup_are_inverses() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();

    let locators = document.locators();
    let lookup = document.article_id_lookup();

    for (article_id, area_ids) in locators {
        for area_id in area_ids {
            assert_eq!(lookup.get(area_id), Some(article_id));
        }
    }
    for (area_id, article_id) in lookup {
        assert!(locators.get(article_id).unwrap().contains(area_id));
    }
}

#[test]
fn parts_coord_round_trips_into_areas() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();

    let parts_coord = document.parts_coord();
    assert_eq!(parts_coord.len(), 4);

    for area in document.areas().unwrap() {
        let part = parts_coord.get(area.id()).unwrap();
        assert_eq!(part.shape.as_deref(), area.shape());
        let rect = altopress::Rect::from_coord_string(part.coords.as_deref().unwrap()).unwrap();
        assert_eq!(rect, area.rect());
    }
}

#[test]
fn areas_resolve_article_ids_and_page_parts() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();

    let areas = document.areas_on_page("0001").unwrap();
    assert_eq!(areas.len(), 2);
    assert_eq!(areas[0].id(), "pa0001001");
    assert_eq!(areas[0].article_id(), Some("art0001"));
    assert_eq!(areas[0].page_part(), Some("page1 area1"));

    // pa0002002 appears in the physical map but never in structLink.
    let page2 = document.areas_on_page("0002").unwrap();
    let unlinked = page2.iter().find(|a| a.id() == "pa0002002").unwrap();
    assert_eq!(unlinked.article_id(), None);
    assert_eq!(unlinked.page_part(), None);
}

#[test]
fn page_areas_resolve_their_textblocks() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();
    let page = document.page("0001").unwrap();

    let areas = page.areas(&document).unwrap();
    assert_eq!(areas.len(), 2);
    let block = areas[0].textblock(&page).unwrap().unwrap();
    assert_eq!(block.id(), "pa0001001");
    assert_eq!(
        block.words().collect::<Vec<_>>(),
        vec!["The", "Parliament", "assembled"]
    );
}

#[test]
fn articles_pair_areas_with_textblocks_in_link_order() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();

    let article = document.article("art0001").unwrap().unwrap();
    assert_eq!(article.parts.len(), 2);

    let first = &article.parts[0];
    assert_eq!(first.area.id(), "pa0001001");
    assert_eq!(first.textblock.id(), "pa0001001");
    assert_eq!(first.textblock.page_area(), Some("page1 area1"));
    assert_eq!(first.textblock.shape(), Some("RECT"));
    assert_eq!(
        first.textblock.coords(),
        Some(altopress::Rect::new(1220, 5, 2893, 221))
    );

    let second = &article.parts[1];
    assert_eq!(second.area.id(), "pa0001003");
    assert_eq!(second.textblock.page_area(), Some("page1 area3"));
    assert_eq!(
        second.textblock.words().collect::<Vec<_>>(),
        vec!["yesterday", "afternoon"]
    );
}

#[test]
fn articles_memoize_to_stable_references() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();
    let first = document.articles().unwrap().as_ptr();
    let second = document.articles().unwrap().as_ptr();
    assert_eq!(first, second);
}

#[test]
fn page_geometry_and_textblocks() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();
    let page = document.page("0001").unwrap();

    assert_eq!(page.width(), 6000);
    assert_eq!(page.height(), 8000);
    assert_eq!(page.confidence(), 0.91);
    assert_eq!(page.textblocks().len(), 2);
    assert_eq!(page.words().count(), 5);
    // One word has no WC: the sequences are independently lengthed.
    assert_eq!(page.word_confidences().count(), 4);
}

#[test]
fn empty_textblock_bounding_box_falls_back_to_page_rect() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();
    let page = document.page("0002").unwrap();

    let empty = page.textblock_by_id("pa0002002").unwrap().unwrap();
    assert_eq!(empty.bounding_box(), altopress::Rect::new(0, 0, 6000, 8000));

    let full = page.textblock_by_id("pa0002001").unwrap().unwrap();
    let bbox = full.bounding_box();
    for token in full.tokens() {
        assert!(bbox.x0 <= token.x);
        assert!(bbox.y0 <= token.y);
        assert!(bbox.x1 >= token.x + token.width);
        assert!(bbox.y1 >= token.y + token.height);
    }
}

#[test]
fn fuzzy_match_scenario() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();
    let page = document.page("0001").unwrap();
    let block = page.textblock_by_id("pa0001001").unwrap().unwrap();

    let opts = MatchOptions {
        fuzz_method: FuzzMethod::TokenSetRatio,
        min_ratio: 80.0,
        ..MatchOptions::default()
    };
    let matches = block.matches(&["parliment"], &opts).unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].score >= 80.0);
    assert_eq!(matches[0].token, "Parliament");

    let regex_opts = MatchOptions {
        regex: true,
        ..MatchOptions::default()
    };
    let regex_matches = block.matches(&["Parliament"], &regex_opts).unwrap();
    assert_eq!(regex_matches.len(), 1);
    assert_eq!(regex_matches[0].score, 100.0);
}

#[test]
fn match_navigation_points_back_to_the_block() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();
    let document = archive.document(0).unwrap();

    let opts = MatchOptions {
        regex: true,
        ..MatchOptions::default()
    };
    let matches = document.matches(&["Shipping"], &opts).unwrap();
    assert_eq!(matches.len(), 1);
    let nav = &matches[0].navigation;
    assert_eq!(nav.archive, archive.path().display().to_string());
    assert_eq!(nav.document_code, "0000164_18470101");
    assert_eq!(nav.page_code, "0002");
    assert_eq!(nav.textblock_id, "pa0002001");
}

#[test]
fn document_info_and_page_info() {
    let dir = fixture_archive();
    let archive = Archive::open(dir.path()).unwrap();

    let info = archive.document_info("0000164_18470101").unwrap().unwrap();
    assert_eq!(info.name, "0000164_18470101_mets.xml");
    assert!(info.size > 0);

    let page_info = archive.page_info("0000164_18470101", "0001").unwrap().unwrap();
    assert_eq!(page_info.name, "0000164_18470101_0001.xml");
    assert!(archive.page_info("0000164_18470101", "9999").unwrap().is_none());
}

#[test]
fn malformed_mets_fails_only_that_document() {
    let dir = fixture_archive();
    std::fs::write(
        dir.path().join("0000164_18470103_mets.xml"),
        "<mets:mets xmlns:mets=\"u\"", // truncated
    )
    .unwrap();
    std::fs::write(dir.path().join("0000164_18470103_0001.xml"), ALTO_EMPTY).unwrap();

    let archive = Archive::open(dir.path()).unwrap();
    assert_eq!(archive.document_count(), 3);

    let results: Vec<Result<_, _>> = archive.documents().collect();
    let failures = results.iter().filter(|r| r.is_err()).count();
    assert_eq!(failures, 1);
    assert!(matches!(
        archive.document_by_code("0000164_18470103").unwrap_err(),
        AltoError::MalformedDocument(_)
    ));
    // The other documents still open.
    assert!(archive.document_by_code("0000164_18470101").is_ok());
}

#[test]
fn fixed_family_open_rejects_other_layouts() {
    let dir = fixture_archive();
    let err = Archive::open_with_family(dir.path(), ArchiveFamily::books()).unwrap_err();
    assert!(matches!(err, AltoError::MalformedArchive(_)));
    assert!(Archive::open_with_family(dir.path(), ArchiveFamily::newspapers()).is_ok());
}

#[test]
fn books_family_layout_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("ALTO")).unwrap();
    std::fs::write(dir.path().join("104598986_metadata.xml"), METS).unwrap();
    std::fs::write(dir.path().join("ALTO/104598986_000001.xml"), ALTO_EMPTY).unwrap();
    std::fs::write(dir.path().join("ALTO/104598986_000002.xml"), ALTO_EMPTY).unwrap();

    let archive = Archive::open(dir.path()).unwrap();
    assert_eq!(archive.family().name(), "books");
    let document = archive.document(0).unwrap();
    assert_eq!(document.document_type(), "book");
    assert_eq!(document.page_codes(), &["000001", "000002"]);
}
